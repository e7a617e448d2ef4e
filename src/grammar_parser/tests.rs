use super::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chumsky::prelude::*;

    fn names(alt: &[Symbol<'_>]) -> Vec<String> {
        alt.iter()
            .map(|sym| match sym {
                Symbol::Terminal(t) => format!("\"{}\"", t),
                Symbol::NonTerminal(nt) => nt.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_single_rule() {
        let input = r#"NP -> "det" N"#;
        let result = grammar().parse(input);

        assert!(!result.has_errors());
        let rules = result.output().expect("Should have output");
        assert_eq!(rules.len(), 1);

        let rule = &rules[0];
        assert_eq!(rule.lhs.text, "NP");
        assert_eq!(rule.alternatives.len(), 1);
        assert_eq!(names(&rule.alternatives[0]), vec!["\"det\"", "N"]);
    }

    #[test]
    fn test_alternatives() {
        let input = r#"NP3 -> "adj" NP3 | "n" | "n" PREPS"#;
        let result = grammar().parse(input);

        assert!(!result.has_errors());
        let rules = result.output().expect("Should have output");
        let alts: Vec<_> = rules[0].alternatives.iter().map(|a| names(a)).collect();
        assert_eq!(
            alts,
            vec![
                vec!["\"adj\"", "NP3"],
                vec!["\"n\""],
                vec!["\"n\"", "PREPS"],
            ]
        );
    }

    #[test]
    fn test_epsilon_alternative() {
        let input = r#"Opt -> "x" | ε"#;
        let result = grammar().parse(input);

        assert!(!result.has_errors());
        let rules = result.output().expect("Should have output");
        assert_eq!(rules[0].alternatives.len(), 2);
        assert!(rules[0].alternatives[1].is_empty());
    }

    #[test]
    fn test_multiline_with_comments_and_blank_lines() {
        let input = r#"
# a tiny English fragment
S   -> NP VP   # declarative

NP  -> "det" N
N   -> "n" ; VP -> "vi"
"#;
        let result = grammar().parse(input);

        assert!(!result.has_errors(), "{:?}", result.errors().collect::<Vec<_>>());
        let rules = result.output().expect("Should have output");
        let lhs: Vec<_> = rules.iter().map(|r| r.lhs.text).collect();
        assert_eq!(lhs, vec!["S", "NP", "N", "VP"]);
    }

    #[test]
    fn test_spans_point_into_source() {
        let input = r#"NP -> "det" N"#;
        let result = grammar().parse(input);
        let rules = result.output().expect("Should have output");

        let Symbol::Terminal(det) = &rules[0].alternatives[0][0] else {
            panic!("Expected terminal symbol");
        };
        assert_eq!(&input[det.span.start..det.span.end], "det");
        assert_eq!(rules[0].lhs.span.start, 0);
    }

    #[test]
    fn test_lexicon_entries() {
        let input = r#"
the     : det
class   : n v
don't   : aux   # contraction
"#;
        let result = lexicon().parse(input);

        assert!(!result.has_errors(), "{:?}", result.errors().collect::<Vec<_>>());
        let entries = result.output().expect("Should have output");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].word.text, "class");
        let cats: Vec<_> = entries[1].categories.iter().map(|c| c.text).collect();
        assert_eq!(cats, vec!["n", "v"]);
        assert_eq!(entries[2].word.text, "don't");
    }

    #[test]
    fn test_lexicon_categories_match_terminal_names() {
        let input = "cats : n-pl n.sg\n";
        let entries = lexicon().parse(input).into_result().expect("Should parse");
        let cats: Vec<_> = entries[0].categories.iter().map(|c| c.text).collect();
        assert_eq!(cats, vec!["n-pl", "n.sg"]);

        let rules = grammar().parse(r#"N -> "n-pl" | "n.sg""#).into_result().expect("Should parse");
        let alts: Vec<_> = rules[0].alternatives.iter().map(|a| names(a)).collect();
        assert_eq!(alts, vec![vec!["\"n-pl\""], vec!["\"n.sg\""]]);
    }

    #[test]
    fn test_empty_input() {
        let result = grammar().parse("");
        assert!(!result.has_errors());
        assert!(result.output().expect("Should have output").is_empty());
    }
}
