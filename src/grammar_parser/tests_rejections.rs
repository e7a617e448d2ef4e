use chumsky::Parser;

use crate::grammar_parser::{grammar, lexicon};

#[cfg(test)]
mod invalid_input_tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn log_errors(test_name: &str, input: &str, errors: impl IntoIterator<Item = impl std::fmt::Display>) {
        init_logger();
        log::info!("{}: input {:?}", test_name, input);
        for e in errors {
            log::info!("  - {}", e);
        }
    }

    #[test]
    fn test_unclosed_quote() {
        let input = r#"NP -> "det N"#;
        let result = grammar().parse(input);

        assert!(result.has_errors(), "Expected parser to fail on unclosed quote");
        log_errors("unclosed_quote", input, result.errors());
    }

    #[test]
    fn test_missing_arrow() {
        let input = r#"NP "det" N"#;
        let result = grammar().parse(input);

        assert!(result.has_errors(), "Expected parser to fail when '->' is missing");
        log_errors("missing_arrow", input, result.errors());
    }

    #[test]
    fn test_empty_alternative_needs_epsilon() {
        let input = r#"Opt -> "x" |"#;
        let result = grammar().parse(input);

        assert!(result.has_errors(), "Expected parser to fail on a bare '|'");
        log_errors("empty_alternative", input, result.errors());
    }

    #[test]
    fn test_empty_terminal() {
        let input = r#"S -> "" NP"#;
        let result = grammar().parse(input);

        assert!(result.has_errors(), "Expected parser to fail on an empty terminal");
        log_errors("empty_terminal", input, result.errors());
    }

    #[test]
    fn test_second_line_error_is_reported() {
        let input = "S -> NP VP\nNP => \"det\"\n";
        let result = grammar().parse(input);

        assert!(result.has_errors(), "Expected parser to fail on the second rule");
        log_errors("second_line", input, result.errors());
    }

    #[test]
    fn test_lexicon_word_without_categories() {
        let input = "the :\nclass : n";
        let result = lexicon().parse(input);

        assert!(result.has_errors(), "Expected parser to fail on a word with no category");
        log_errors("lexicon_no_category", input, result.errors());
    }
}
