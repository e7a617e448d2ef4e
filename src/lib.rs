//! Earley chart recognition of tagged sentences against a context-free
//! grammar.
//!
//! ```
//! use earleychart::{EarleyParser, Lexicon};
//!
//! let parser = EarleyParser::from_grammar_text(
//!     r#"
//! S  -> NP VP
//! NP -> "det" N
//! N  -> "n"
//! VP -> "vi"
//! "#,
//!     "S",
//! )
//! .unwrap();
//! let lexicon = Lexicon::from_text("the : det\nstudent : n\nsat : vi").unwrap();
//!
//! assert!(parser.accepts("the student sat", &lexicon));
//! assert!(!parser.accepts("the student", &lexicon));
//! ```
use thiserror::Error;

pub mod conversion;
pub mod grammar;
pub mod grammar_parser;
pub mod lexicon;
pub mod recognizer;
pub mod tree;
mod try_accept;

pub use grammar::{Grammar, GrammarError, Production, Symbol, Validation, DEFAULT_START};
pub use lexicon::{tag, tag_words, tokenize, Lexicon, Span, Tagger, Token};
pub use recognizer::{Chart, Column, Item};
pub use tree::ParseTree;
pub use try_accept::ParseError;

#[derive(Debug, Error)]
pub enum EarleyError {
    #[error("Error(s) while parsing the grammar : {0}")]
    InvalidGrammar(String),
    #[error("Error(s) while parsing the lexicon : {0}")]
    InvalidLexicon(String),
    #[error("Invalid grammar : {0}")]
    Grammar(#[from] GrammarError),
    #[error("Error while parsing input : {0}")]
    ParseError(#[from] ParseError),
    #[error("Could not build a parse tree from an accepting chart")]
    BuildParseTreeError,
}

/// A grammar ready to recognize sentences. It is only read while parsing, so
/// one parser can serve many threads.
pub struct EarleyParser<'gr> {
    grammar: Grammar<'gr>,
}

impl<'gr> EarleyParser<'gr> {
    pub fn new(grammar: Grammar<'gr>) -> Self {
        Self { grammar }
    }

    /// Loads the grammar notation, refusing undefined nonterminals.
    pub fn from_grammar_text(text: &'gr str, start: &'gr str) -> Result<Self, EarleyError> {
        Self::from_grammar_text_with(text, start, Validation::Strict)
    }

    pub fn from_grammar_text_with(
        text: &'gr str,
        start: &'gr str,
        validation: Validation,
    ) -> Result<Self, EarleyError> {
        Ok(Self::new(Grammar::from_text(text, start, validation)?))
    }

    pub fn grammar(&self) -> &Grammar<'gr> {
        &self.grammar
    }

    /// Builds the full chart for already tagged tokens.
    pub fn recognize_tokens<'p, 'inp>(&'p self, tokens: Vec<Token<'inp>>) -> Chart<'p, 'inp> {
        let mut chart = Chart::new(&self.grammar, tokens);
        chart.recognize();
        chart
    }

    pub fn recognize<'p, 'inp>(&'p self, sentence: &'inp str, tagger: &impl Tagger) -> Chart<'p, 'inp> {
        self.recognize_tokens(tag(sentence, tagger))
    }

    pub fn accepts(&self, sentence: &str, tagger: &impl Tagger) -> bool {
        self.recognize(sentence, tagger).accepted()
    }

    /// Recognizes the sentence and returns one of its parse trees.
    pub fn parse<'p, 'inp>(
        &'p self,
        sentence: &'inp str,
        tagger: &impl Tagger,
    ) -> Result<ParseTree<'p, 'inp>, EarleyError> {
        let chart = self.recognize(sentence, tagger);
        chart.try_accept()?;
        chart
            .build_parse_tree()
            .ok_or(EarleyError::BuildParseTreeError)
    }
}
