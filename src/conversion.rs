use chumsky::Parser;

use crate::{
    grammar::{self, Grammar, GrammarError, Production, Validation},
    grammar_parser::{self, describe_errors, LexEntry, Rule},
    lexicon::Lexicon,
    EarleyError,
};

impl<'gr> From<&grammar_parser::Symbol<'gr>> for grammar::Symbol<'gr> {
    fn from(sym: &grammar_parser::Symbol<'gr>) -> Self {
        match sym {
            grammar_parser::Symbol::Terminal(s) => grammar::Symbol::Terminal(s.text),
            grammar_parser::Symbol::NonTerminal(s) => grammar::Symbol::NonTerminal(s.text),
        }
    }
}

/// One production per alternative, in source order.
pub fn productions<'gr>(rules: &[Rule<'gr>]) -> Vec<Production<'gr>> {
    rules
        .iter()
        .flat_map(|rule| {
            rule.alternatives
                .iter()
                .map(|alt| Production::new(rule.lhs.text, alt.iter().map(Into::into).collect()))
        })
        .collect()
}

impl<'gr> Grammar<'gr> {
    pub fn from_rules(
        start: &'gr str,
        rules: &[Rule<'gr>],
        validation: Validation,
    ) -> Result<Self, GrammarError> {
        let grammar = Grammar::new(start, productions(rules));
        if validation == Validation::Strict {
            grammar.validate()?;
        }
        Ok(grammar)
    }

    /// Parses the grammar notation of [`grammar_parser`].
    pub fn from_text(
        text: &'gr str,
        start: &'gr str,
        validation: Validation,
    ) -> Result<Self, EarleyError> {
        let (rules, errors) = grammar_parser::grammar().parse(text).into_output_errors();
        if !errors.is_empty() {
            return Err(EarleyError::InvalidGrammar(describe_errors(&errors)));
        }
        let rules = rules.ok_or_else(|| EarleyError::InvalidGrammar("no rules".to_string()))?;
        Ok(Self::from_rules(start, &rules, validation)?)
    }
}

impl From<&[LexEntry<'_>]> for Lexicon {
    fn from(entries: &[LexEntry<'_>]) -> Self {
        entries
            .iter()
            .map(|e| (e.word.text, e.categories.iter().map(|c| c.text)))
            .collect()
    }
}

impl Lexicon {
    /// Parses the lexicon notation of [`grammar_parser`].
    pub fn from_text(text: &str) -> Result<Self, EarleyError> {
        let (entries, errors) = grammar_parser::lexicon().parse(text).into_output_errors();
        if !errors.is_empty() {
            return Err(EarleyError::InvalidLexicon(describe_errors(&errors)));
        }
        let entries =
            entries.ok_or_else(|| EarleyError::InvalidLexicon("no entries".to_string()))?;
        Ok(Lexicon::from(entries.as_slice()))
    }
}
