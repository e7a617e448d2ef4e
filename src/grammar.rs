use std::collections::HashMap;

use thiserror::Error;

/// Start symbol used when none is given.
pub const DEFAULT_START: &str = "S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol<'gr> {
    Terminal(&'gr str),
    NonTerminal(&'gr str),
}

impl<'gr> Symbol<'gr> {
    pub fn name(&self) -> &'gr str {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) => name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl std::fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Terminal(name) => write!(f, "\"{}\"", name),
            Symbol::NonTerminal(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production<'gr> {
    pub lhs: &'gr str,
    pub rhs: Vec<Symbol<'gr>>,
}

impl<'gr> Production<'gr> {
    pub fn new(lhs: &'gr str, rhs: Vec<Symbol<'gr>>) -> Self {
        Self { lhs, rhs }
    }
}

impl std::fmt::Display for Production<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        if self.rhs.is_empty() {
            return write!(f, " ε");
        }
        for sym in &self.rhs {
            write!(f, " {}", sym)?;
        }
        Ok(())
    }
}

/// What to do with a production that references a nonterminal nobody defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Refuse the grammar.
    #[default]
    Strict,
    /// Accept the grammar; predicting the missing nonterminal adds nothing.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("nonterminal `{name}` used in a production of `{lhs}` has no productions")]
    UndefinedNonTerminal { lhs: String, name: String },
    #[error("start symbol `{0}` has no productions")]
    UndefinedStart(String),
}

/// The grammar table: every production, plus an index from each nonterminal
/// to its alternatives in declaration order. Never mutated once built.
#[derive(Debug, Clone)]
pub struct Grammar<'gr> {
    pub productions: Vec<Production<'gr>>,
    pub start: &'gr str,
    by_lhs: HashMap<&'gr str, Vec<usize>>,
}

impl<'gr> Grammar<'gr> {
    /// Builds the table without validating it. A production listed twice for
    /// the same nonterminal is kept once.
    pub fn new(start: &'gr str, productions: impl IntoIterator<Item = Production<'gr>>) -> Self {
        let mut grammar = Grammar {
            productions: Vec::new(),
            start,
            by_lhs: HashMap::new(),
        };
        for prod in productions {
            let ids = grammar.by_lhs.entry(prod.lhs).or_default();
            if ids.iter().any(|&id| grammar.productions[id] == prod) {
                continue;
            }
            ids.push(grammar.productions.len());
            grammar.productions.push(prod);
        }
        grammar
    }

    /// Builds the table from a `nonterminal -> alternatives` mapping and
    /// validates it with the given policy.
    pub fn from_table<T>(start: &'gr str, table: T, validation: Validation) -> Result<Self, GrammarError>
    where
        T: IntoIterator<Item = (&'gr str, Vec<Vec<Symbol<'gr>>>)>,
    {
        let productions = table.into_iter().flat_map(|(lhs, alternatives)| {
            alternatives
                .into_iter()
                .map(move |rhs| Production::new(lhs, rhs))
        });
        let grammar = Self::new(start, productions);
        if validation == Validation::Strict {
            grammar.validate()?;
        }
        Ok(grammar)
    }

    /// Checks that the start symbol and every referenced nonterminal have at
    /// least one production.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if !self.is_defined(self.start) {
            return Err(GrammarError::UndefinedStart(self.start.to_string()));
        }
        for prod in &self.productions {
            for sym in &prod.rhs {
                if let Symbol::NonTerminal(name) = sym {
                    if !self.is_defined(name) {
                        return Err(GrammarError::UndefinedNonTerminal {
                            lhs: prod.lhs.to_string(),
                            name: name.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.by_lhs.contains_key(name)
    }

    /// Production ids of `name`, in declaration order. Empty when undefined.
    pub fn prods_for(&self, name: &str) -> &[usize] {
        self.by_lhs.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn production(&self, id: usize) -> &Production<'gr> {
        &self.productions[id]
    }

    /// Nonterminals in first-declaration order.
    pub fn nonterminals(&self) -> Vec<&'gr str> {
        let mut seen = Vec::new();
        for prod in &self.productions {
            if !seen.contains(&prod.lhs) {
                seen.push(prod.lhs);
            }
        }
        seen
    }
}

impl std::fmt::Display for Grammar<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{}", prod)?;
        }
        Ok(())
    }
}
