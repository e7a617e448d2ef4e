//! Text notations for grammars and lexicons.
//!
//! Grammar, one rule per line (or `;`-separated), `#` starts a comment:
//!
//! ```text
//! S   -> NP VP | NP VP PREPS
//! NP  -> "det" NP3
//! NP3 -> "adj" NP3 | "n"
//! Opt -> "x" | ε
//! ```
//!
//! Bare identifiers are nonterminals, double-quoted names are terminal
//! categories and `ε` is the empty production.
//!
//! Lexicon, one word per line, followed by its categories:
//!
//! ```text
//! the   : det
//! class : n v
//! ```
#[cfg(test)]
mod tests;
#[cfg(test)]
mod tests_rejections;

use chumsky::{
    prelude::*,
    text::{inline_whitespace, newline},
};

type Extra<'gr> = extra::Err<Rich<'gr, char>>;

/// A name as written in the notation, with its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name<'gr> {
    pub text: &'gr str,
    pub span: SimpleSpan,
}

impl std::fmt::Display for Name<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol<'gr> {
    Terminal(Name<'gr>),
    NonTerminal(Name<'gr>),
}

/// `lhs -> alt | alt | ...` as written.
#[derive(Debug, Clone)]
pub struct Rule<'gr> {
    pub lhs: Name<'gr>,
    pub alternatives: Vec<Vec<Symbol<'gr>>>,
}

#[derive(Debug, Clone)]
pub struct LexEntry<'a> {
    pub word: Name<'a>,
    pub categories: Vec<Name<'a>>,
}

pub fn grammar<'gr>() -> impl Parser<'gr, &'gr str, Vec<Rule<'gr>>, Extra<'gr>> {
    rule()
        .separated_by(line_break())
        .allow_leading()
        .allow_trailing()
        .collect()
        .then_ignore(line_tail())
}

pub fn lexicon<'a>() -> impl Parser<'a, &'a str, Vec<LexEntry<'a>>, Extra<'a>> {
    lex_entry()
        .separated_by(line_break())
        .allow_leading()
        .allow_trailing()
        .collect()
        .then_ignore(line_tail())
}

fn comment<'gr>() -> impl Parser<'gr, &'gr str, (), Extra<'gr>> {
    just('#').then(none_of("\r\n").repeated()).ignored()
}

fn line_break<'gr>() -> impl Parser<'gr, &'gr str, (), Extra<'gr>> {
    inline_whitespace()
        .then(comment().or_not())
        .ignore_then(choice((just(';').ignored(), newline())))
        .then_ignore(inline_whitespace())
        .repeated()
        .at_least(1)
}

/// Whitespace or a comment on a last line without newline.
fn line_tail<'gr>() -> impl Parser<'gr, &'gr str, (), Extra<'gr>> {
    inline_whitespace().then(comment().or_not()).ignored()
}

fn rule<'gr>() -> impl Parser<'gr, &'gr str, Rule<'gr>, Extra<'gr>> {
    ident()
        .padded_by(inline_whitespace())
        .then_ignore(just("->"))
        .then(
            alternative()
                .separated_by(just('|'))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .map(|(lhs, alternatives)| Rule { lhs, alternatives })
}

fn alternative<'gr>() -> impl Parser<'gr, &'gr str, Vec<Symbol<'gr>>, Extra<'gr>> {
    choice((
        just('ε').padded_by(inline_whitespace()).to(Vec::new()),
        symbol()
            .padded_by(inline_whitespace())
            .repeated()
            .at_least(1)
            .collect::<Vec<_>>(),
    ))
}

fn symbol<'gr>() -> impl Parser<'gr, &'gr str, Symbol<'gr>, Extra<'gr>> {
    let terminal = category()
        .delimited_by(just('"'), just('"'))
        .map(Symbol::Terminal);
    choice((terminal, ident().map(Symbol::NonTerminal)))
}

fn spanned<'gr>(
    text: impl Parser<'gr, &'gr str, &'gr str, Extra<'gr>>,
) -> impl Parser<'gr, &'gr str, Name<'gr>, Extra<'gr>> {
    text.map_with(|text, extra| Name {
        text,
        span: extra.span(),
    })
}

fn ident<'gr>() -> impl Parser<'gr, &'gr str, Name<'gr>, Extra<'gr>> {
    spanned(text::ident())
}

/// A terminal category: quoted in grammars, bare in lexicons.
fn category<'gr>() -> impl Parser<'gr, &'gr str, Name<'gr>, Extra<'gr>> {
    spanned(none_of("\":;# \t\r\n").repeated().at_least(1).to_slice())
}

fn lex_entry<'a>() -> impl Parser<'a, &'a str, LexEntry<'a>, Extra<'a>> {
    let word = spanned(none_of(":;# \t\r\n").repeated().at_least(1).to_slice());
    word.padded_by(inline_whitespace())
        .then_ignore(just(':'))
        .then(
            category()
                .padded_by(inline_whitespace())
                .repeated()
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .map(|(word, categories)| LexEntry { word, categories })
}

/// Joins parser errors into one message, one error per line.
pub fn describe_errors<'a, E>(errors: impl IntoIterator<Item = &'a E>) -> String
where
    E: std::fmt::Display + 'a,
{
    let mut error_string = String::new();
    for e in errors {
        error_string += &("\n".to_string() + &e.to_string());
    }
    error_string
}
