use std::collections::{BTreeSet, HashMap};

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} - {}]", self.start, self.end)
    }
}

/// Maps a raw word to the terminal categories it may realize.
pub trait Tagger {
    fn categories(&self, word: &str) -> Vec<String>;
}

impl<F> Tagger for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn categories(&self, word: &str) -> Vec<String> {
        self(word)
    }
}

/// A word annotated with every terminal category it may satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'inp> {
    pub text: &'inp str,
    pub span: Span,
    pub categories: BTreeSet<String>,
}

impl<'inp> Token<'inp> {
    pub fn new<I>(text: &'inp str, span: Span, categories: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            text,
            span,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tagged(text: &'inp str, span: Span, tagger: &impl Tagger) -> Self {
        Self::new(text, span, tagger.categories(text))
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

/// Splits a sentence on Unicode word boundaries. Punctuation is dropped.
pub fn tokenize(sentence: &str) -> Vec<(Span, &str)> {
    sentence
        .unicode_word_indices()
        .map(|(start, word)| (Span::new(start, start + word.len()), word))
        .collect()
}

pub fn tag<'inp>(sentence: &'inp str, tagger: &impl Tagger) -> Vec<Token<'inp>> {
    tokenize(sentence)
        .into_iter()
        .map(|(span, word)| Token::tagged(word, span, tagger))
        .collect()
}

/// Tags words that are already split. Spans are the byte ranges the words
/// would occupy if joined by single spaces.
pub fn tag_words<'inp>(words: &[&'inp str], tagger: &impl Tagger) -> Vec<Token<'inp>> {
    let mut offset = 0;
    words
        .iter()
        .map(|&word| {
            let span = Span::new(offset, offset + word.len());
            offset = span.end + 1;
            Token::tagged(word, span, tagger)
        })
        .collect()
}

/// A word-to-categories dictionary.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<String>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds categories to `word`, keeping the first occurrence of each.
    pub fn insert<I>(&mut self, word: impl Into<String>, categories: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let entry = self.entries.entry(word.into()).or_default();
        for cat in categories {
            let cat = cat.into();
            if !entry.contains(&cat) {
                entry.push(cat);
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.entries
            .get(word)
            .or_else(|| self.entries.get(&word.to_lowercase()))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Tagger for Lexicon {
    fn categories(&self, word: &str) -> Vec<String> {
        self.get(word).map(<[String]>::to_vec).unwrap_or_default()
    }
}

impl<W, I> FromIterator<(W, I)> for Lexicon
where
    W: Into<String>,
    I: IntoIterator,
    I::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (W, I)>>(iter: T) -> Self {
        let mut lexicon = Lexicon::new();
        for (word, cats) in iter {
            lexicon.insert(word, cats);
        }
        lexicon
    }
}
