use thiserror::Error;

use crate::grammar::{Grammar, Symbol};
use crate::recognizer::{format_item, Chart};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Why a sentence was rejected, for users (expected categories) and for
/// grammar authors (the dotted items stuck at the failure point).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    pub pos: usize,
    pub found: Option<String>,
    pub expected: Vec<String>,
    pub items: Vec<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.found {
            Some(word) => writeln!(
                f,
                "sentence rejected at column {}: unexpected word {:?} (token {})",
                self.pos, word, self.pos
            )?,
            None => writeln!(f, "sentence rejected at column {}: input ended", self.pos)?,
        }

        if self.expected.is_empty() {
            if self.found.is_some() {
                writeln!(f, "expected the sentence to end here")?;
            }
        } else {
            writeln!(f, "expected a word of category: {}", self.expected.join(", "))?;
        }

        if !self.items.is_empty() {
            writeln!(f, "items waiting in column {}:", self.pos)?;
            for it in &self.items {
                writeln!(f, "  {}", it)?;
            }
        }

        Ok(())
    }
}

impl<'gr> Grammar<'gr> {
    /// Terminals that can begin each nonterminal. Nullable prefixes are
    /// looked through.
    pub fn compute_first_sets(&self) -> HashMap<&'gr str, BTreeSet<&'gr str>> {
        let nullable = self.nullable_set();
        let mut first: HashMap<&'gr str, BTreeSet<&'gr str>> = HashMap::new();
        for nt in self.nonterminals() {
            first.entry(nt).or_default();
        }

        let mut changed = true;
        while changed {
            changed = false;
            for prod in &self.productions {
                let mut new_syms = BTreeSet::new();
                for sym in &prod.rhs {
                    match sym {
                        Symbol::Terminal(t) => {
                            new_syms.insert(*t);
                            break;
                        }
                        Symbol::NonTerminal(nt) => {
                            if let Some(rhs_first) = first.get(nt) {
                                new_syms.extend(rhs_first.iter().copied());
                            }
                            if !nullable.contains(nt) {
                                break;
                            }
                        }
                    }
                }
                let lhs_set = first.entry(prod.lhs).or_default();
                let old_len = lhs_set.len();
                lhs_set.extend(new_syms);
                if lhs_set.len() > old_len {
                    changed = true;
                }
            }
        }

        first
    }

    /// Nonterminals that derive the empty string.
    pub fn nullable_set(&self) -> HashSet<&'gr str> {
        let mut nullable = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for prod in &self.productions {
                if nullable.contains(prod.lhs) {
                    continue;
                }
                let all_nullable = prod.rhs.iter().all(|sym| match sym {
                    Symbol::NonTerminal(nt) => nullable.contains(nt),
                    Symbol::Terminal(_) => false,
                });
                if all_nullable {
                    nullable.insert(prod.lhs);
                    changed = true;
                }
            }
        }
        nullable
    }
}

fn expected_tokens<'a>(
    sym: &Symbol<'a>,
    first_sets: &HashMap<&'a str, BTreeSet<&'a str>>,
) -> Vec<String> {
    match sym {
        Symbol::Terminal(s) => vec![s.to_string()],
        Symbol::NonTerminal(nt) => first_sets
            .get(nt)
            .map(|set| set.iter().map(|s| s.to_string()).collect())
            .unwrap_or_default(),
    }
}

impl<'gr, 'inp> Chart<'gr, 'inp> {
    pub fn try_accept(&self) -> Result<(), ParseError> {
        if self.accepted() {
            return Ok(());
        }

        let grammar = self.grammar;
        let first_sets = grammar.compute_first_sets();

        // Furthest column still waiting on some symbol
        let furthest_pos = self
            .columns
            .iter()
            .rposition(|col| col.items().iter().any(|it| !it.is_complete(grammar)))
            .unwrap_or(0);

        // Later columns hold only finished items, so the token after them is extra
        let last_filled = self
            .columns
            .iter()
            .rposition(|col| !col.is_empty())
            .unwrap_or(0);
        if last_filled > furthest_pos {
            return Err(ParseError {
                pos: last_filled,
                found: self.tokens.get(last_filled).map(|t| t.text.to_string()),
                expected: Vec::new(),
                items: Vec::new(),
            });
        }

        let found = self.tokens.get(furthest_pos).map(|t| t.text.to_string());

        let mut expected = Vec::new();
        let mut items = Vec::new();
        if let Some(col) = self.columns.get(furthest_pos) {
            for item in col.items() {
                if let Some(next_sym) = item.next_symbol(grammar) {
                    let prod = grammar.production(item.prod_id);
                    expected.extend(expected_tokens(&next_sym, &first_sets));
                    items.push(format_item(prod.lhs, &prod.rhs, item.dot));
                }
            }
        }

        expected.sort();
        expected.dedup();

        Err(ParseError {
            pos: furthest_pos,
            found,
            expected,
            items,
        })
    }
}
