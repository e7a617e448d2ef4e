use std::collections::HashSet;

use log::Level;

use crate::grammar::{Grammar, Symbol};
use crate::lexicon::Token;

/// A dotted rule: production `prod_id` matched up to `dot`, starting at
/// column `origin`. Productions are unique per nonterminal, so the id stands
/// for the (lhs, body) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item {
    pub prod_id: usize,
    pub dot: usize,
    pub origin: usize,
}

impl Item {
    pub fn new(prod_id: usize, dot: usize, origin: usize) -> Self {
        Item {
            prod_id,
            dot,
            origin,
        }
    }

    pub fn advance(&self) -> Self {
        Item::new(self.prod_id, self.dot + 1, self.origin)
    }

    /// Symbol right after the dot, `None` once the body is fully matched.
    pub fn next_symbol<'gr>(&self, grammar: &Grammar<'gr>) -> Option<Symbol<'gr>> {
        grammar.production(self.prod_id).rhs.get(self.dot).copied()
    }

    pub fn is_complete(&self, grammar: &Grammar<'_>) -> bool {
        self.dot == grammar.production(self.prod_id).rhs.len()
    }

    pub fn lhs<'gr>(&self, grammar: &Grammar<'gr>) -> &'gr str {
        grammar.production(self.prod_id).lhs
    }
}

/// Items valid at one input position, kept in insertion order without
/// duplicates.
#[derive(Debug, Clone)]
pub struct Column {
    pub index: usize,
    items: Vec<Item>,
    seen: HashSet<Item>,
}

impl Column {
    pub fn new(index: usize) -> Self {
        Column {
            index,
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Returns whether the item was new.
    pub fn insert(&mut self, item: Item) -> bool {
        debug_assert!(item.origin <= self.index);
        if self.seen.insert(item) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.seen.contains(item)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct Chart<'gr, 'inp> {
    pub columns: Vec<Column>,
    pub tokens: Vec<Token<'inp>>,
    pub grammar: &'gr Grammar<'gr>,
}

impl<'gr, 'inp> Chart<'gr, 'inp> {
    pub fn new(grammar: &'gr Grammar<'gr>, tokens: Vec<Token<'inp>>) -> Self {
        Self {
            columns: Vec::with_capacity(tokens.len() + 1),
            tokens,
            grammar,
        }
    }

    pub fn start(&self) -> &'gr str {
        self.grammar.start
    }

    pub fn column(&self, pos: usize) -> Option<&Column> {
        self.columns.get(pos)
    }

    fn add_item(&mut self, pos: usize, item: Item) -> bool {
        let added = self.columns[pos].insert(item);
        if added && log::log_enabled!(Level::Trace) {
            log::trace!("[{}] + {}", pos, self.describe_item(&item));
        }
        added
    }

    /// Adds a fresh item at `pos` for every production of `nt`. Returns the
    /// number of new items.
    ///
    /// # Panics
    /// If column `pos` has not been built.
    pub fn predict(&mut self, pos: usize, nt: &str) -> usize {
        assert!(pos < self.columns.len(), "predict into unbuilt column {}", pos);
        let grammar = self.grammar;
        grammar
            .prods_for(nt)
            .iter()
            .filter(|&&pid| self.add_item(pos, Item::new(pid, 0, pos)))
            .count()
    }

    /// Advances every item of column `pos - 1` expecting one of the categories
    /// of token `pos - 1` into column `pos`.
    ///
    /// # Panics
    /// If `pos` is 0, past the last token, or column `pos` has not been built.
    pub fn scan(&mut self, pos: usize) -> usize {
        assert!(
            pos >= 1 && pos <= self.tokens.len() && pos < self.columns.len(),
            "scan into column {} with {} tokens and {} columns",
            pos,
            self.tokens.len(),
            self.columns.len()
        );
        let grammar = self.grammar;
        let token = &self.tokens[pos - 1];
        let advanced: Vec<Item> = self.columns[pos - 1]
            .items()
            .iter()
            .filter(|item| match item.next_symbol(grammar) {
                Some(Symbol::Terminal(cat)) => token.has_category(cat),
                _ => false,
            })
            .map(Item::advance)
            .collect();
        advanced
            .into_iter()
            .filter(|&item| self.add_item(pos, item))
            .count()
    }

    /// Propagates a completed `lhs` that started at `origin` into column `pos`,
    /// advancing every item of the origin column that waits for it.
    ///
    /// # Panics
    /// If `origin > pos` or column `pos` has not been built.
    pub fn complete(&mut self, pos: usize, lhs: &str, origin: usize) -> usize {
        assert!(
            origin <= pos && pos < self.columns.len(),
            "complete from column {} into column {} of {}",
            origin,
            pos,
            self.columns.len()
        );
        let grammar = self.grammar;
        // collected before inserting: when origin == pos this is the snapshot
        let advanced: Vec<Item> = self.columns[origin]
            .items()
            .iter()
            .filter(|item| item.next_symbol(grammar) == Some(Symbol::NonTerminal(lhs)))
            .map(Item::advance)
            .collect();
        advanced
            .into_iter()
            .filter(|&item| self.add_item(pos, item))
            .count()
    }

    /// Runs Complete then Predict over column `pos` until a pass adds nothing.
    /// Returns the number of items added.
    ///
    /// # Panics
    /// If column `pos` has not been built.
    pub fn close(&mut self, pos: usize) -> usize {
        assert!(pos < self.columns.len(), "close of unbuilt column {}", pos);
        let grammar = self.grammar;
        let initial = self.columns[pos].len();
        let mut passes = 0;
        loop {
            passes += 1;
            let before = self.columns[pos].len();

            let completed: Vec<Item> = self.columns[pos]
                .items()
                .iter()
                .filter(|item| item.is_complete(grammar))
                .copied()
                .collect();
            for item in completed {
                self.complete(pos, item.lhs(grammar), item.origin);
            }

            let expected: Vec<&'gr str> = self.columns[pos]
                .items()
                .iter()
                .filter_map(|item| match item.next_symbol(grammar) {
                    Some(Symbol::NonTerminal(nt)) => Some(nt),
                    _ => None,
                })
                .collect();
            for nt in expected {
                self.predict(pos, nt);
            }

            if self.columns[pos].len() == before {
                break;
            }
        }
        let added = self.columns[pos].len() - initial;
        log::debug!(
            "column {} sealed: {} items, {} added in {} passes",
            pos,
            self.columns[pos].len(),
            added,
            passes
        );
        added
    }

    /// Fills columns `0..=n`: seeds column 0 with the start symbol, then scans
    /// each token into the next column and closes it.
    pub fn recognize(&mut self) {
        self.columns.clear();
        self.columns.push(Column::new(0));
        let start = self.grammar.start;
        self.predict(0, start);
        self.close(0);

        for pos in 1..=self.tokens.len() {
            self.columns.push(Column::new(pos));
            let scanned = self.scan(pos);
            if scanned == 0 {
                log::debug!(
                    "no item scanned token {} ({:?})",
                    pos - 1,
                    self.tokens[pos - 1].text
                );
            }
            self.close(pos);
        }
        log::debug!(
            "recognized {} tokens: {}",
            self.tokens.len(),
            if self.accepted() { "accept" } else { "reject" }
        );
    }

    /// Whether the last column holds a completed start item with origin 0.
    pub fn accepted(&self) -> bool {
        let grammar = self.grammar;
        self.columns
            .get(self.tokens.len())
            .map(|column| {
                column.items().iter().any(|item| {
                    item.origin == 0
                        && item.is_complete(grammar)
                        && item.lhs(grammar) == grammar.start
                })
            })
            .unwrap_or(false)
    }

    pub fn describe_item(&self, item: &Item) -> String {
        let prod = self.grammar.production(item.prod_id);
        format!(
            "{} [{}]",
            format_item(prod.lhs, &prod.rhs, item.dot),
            item.origin
        )
    }
}

/// Renders a dotted rule as `A -> x • y`.
pub fn format_item(lhs: &str, rhs: &[Symbol], dot: usize) -> String {
    let mut parts = Vec::new();
    for (i, sym) in rhs.iter().enumerate() {
        if i == dot {
            parts.push("•".to_string());
        }
        parts.push(sym.to_string());
    }
    if dot == rhs.len() {
        parts.push("•".to_string());
    }
    format!("{} -> {}", lhs, parts.join(" "))
}

impl std::fmt::Display for Chart<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for column in &self.columns {
            match column.index.checked_sub(1).and_then(|i| self.tokens.get(i)) {
                Some(tok) => writeln!(f, "== {} ({})", column.index, tok.text)?,
                None => writeln!(f, "== {}", column.index)?,
            }
            for item in column.items() {
                writeln!(f, "  {}", self.describe_item(item))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod recognizer_tests {
    use super::*;
    use crate::grammar::{Production, Validation};
    use crate::lexicon::{tag_words, Lexicon};
    use Symbol::{NonTerminal as N, Terminal as T};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sentence_grammar() -> Grammar<'static> {
        Grammar::from_table(
            "S",
            vec![
                ("S", vec![vec![N("NP"), N("VP")]]),
                ("NP", vec![vec![T("det"), N("N")]]),
                ("N", vec![vec![T("n")]]),
                ("VP", vec![vec![T("vi")]]),
            ],
            Validation::Strict,
        )
        .unwrap()
    }

    fn lexicon() -> Lexicon {
        [
            ("the", vec!["det"]),
            ("student", vec!["n"]),
            ("sat", vec!["vi"]),
        ]
        .into_iter()
        .collect()
    }

    fn run<'gr>(grammar: &'gr Grammar<'gr>, words: &[&'static str]) -> Chart<'gr, 'static> {
        init_logger();
        let mut chart = Chart::new(grammar, tag_words(words, &lexicon()));
        chart.recognize();
        chart
    }

    #[test]
    fn column_zero_is_closed_under_prediction() {
        let grammar = sentence_grammar();
        let chart = run(&grammar, &[]);
        let col = chart.column(0).unwrap();
        let lhs: Vec<_> = col.items().iter().map(|it| it.lhs(&grammar)).collect();
        assert_eq!(lhs, vec!["S", "NP"]);
        assert!(!chart.accepted());
    }

    #[test]
    fn accepts_complete_sentence() {
        let grammar = sentence_grammar();
        let chart = run(&grammar, &["the", "student", "sat"]);
        assert_eq!(chart.columns.len(), 4);
        assert!(chart.accepted());
        assert!(chart.columns[3].contains(&Item::new(0, 2, 0)));
    }

    #[test]
    fn truncated_sentence_completes_np_only() {
        let grammar = sentence_grammar();
        let chart = run(&grammar, &["the", "student"]);
        assert!(!chart.accepted());
        let last = chart.column(2).unwrap();
        assert!(last
            .items()
            .iter()
            .any(|it| it.lhs(&grammar) == "NP" && it.is_complete(&grammar) && it.origin == 0));
    }

    #[test]
    fn column_insert_deduplicates() {
        let mut col = Column::new(3);
        assert!(col.insert(Item::new(0, 0, 3)));
        assert!(col.insert(Item::new(0, 1, 2)));
        assert!(!col.insert(Item::new(0, 0, 3)));
        assert_eq!(col.items(), &[Item::new(0, 0, 3), Item::new(0, 1, 2)]);
    }

    #[test]
    fn closing_a_sealed_column_adds_nothing() {
        let grammar = sentence_grammar();
        let mut chart = run(&grammar, &["the", "student", "sat"]);
        for pos in 0..chart.columns.len() {
            assert_eq!(chart.close(pos), 0);
        }
    }

    #[test]
    fn predict_undefined_nonterminal_is_noop() {
        let grammar = Grammar::new("S", vec![Production::new("S", vec![N("Missing")])]);
        let mut chart = Chart::new(&grammar, vec![]);
        chart.recognize();
        assert_eq!(chart.predict(0, "Missing"), 0);
        assert_eq!(chart.columns[0].len(), 1);
        assert!(!chart.accepted());
    }

    #[test]
    fn nullable_nonterminals_complete_within_column() {
        // S -> A A "x" ; A -> ε
        let grammar = Grammar::new(
            "S",
            vec![
                Production::new("S", vec![N("A"), N("A"), T("x")]),
                Production::new("A", vec![]),
            ],
        );
        let tagger = |_: &str| vec!["x".to_string()];
        let mut chart = Chart::new(&grammar, tag_words(&["x"], &tagger));
        chart.recognize();
        assert!(chart.columns[0].contains(&Item::new(0, 2, 0)));
        assert!(chart.accepted());
    }

    #[test]
    fn left_recursion_terminates() {
        // L -> L "a" | "a"
        let grammar = Grammar::new(
            "L",
            vec![
                Production::new("L", vec![N("L"), T("a")]),
                Production::new("L", vec![T("a")]),
            ],
        );
        let tagger = |_: &str| vec!["a".to_string()];
        let mut chart = Chart::new(&grammar, tag_words(&["a", "a", "a", "a"], &tagger));
        chart.recognize();
        assert!(chart.accepted());
        for column in &chart.columns {
            assert!(column.items().iter().all(|it| it.origin <= column.index));
        }
    }

    #[test]
    #[should_panic(expected = "scan into column 0")]
    fn scan_into_column_zero_panics() {
        let grammar = sentence_grammar();
        let mut chart = run(&grammar, &["the"]);
        chart.scan(0);
    }

    #[test]
    #[should_panic(expected = "complete from column 2 into column 1")]
    fn complete_from_later_origin_panics() {
        let grammar = sentence_grammar();
        let mut chart = run(&grammar, &["the", "student"]);
        chart.complete(1, "N", 2);
    }

    #[test]
    #[should_panic(expected = "close of unbuilt column 2")]
    fn close_past_last_column_panics() {
        let grammar = sentence_grammar();
        let mut chart = run(&grammar, &["the"]);
        chart.close(2);
    }

    #[test]
    fn unknown_word_empties_later_columns() {
        let grammar = sentence_grammar();
        let chart = run(&grammar, &["the", "blorp", "sat"]);
        assert!(chart.columns[2].is_empty());
        assert!(chart.columns[3].is_empty());
        assert!(!chart.accepted());
    }

    #[test]
    fn display_lists_dotted_items() {
        let grammar = sentence_grammar();
        let chart = run(&grammar, &["the"]);
        let out = chart.to_string();
        assert!(out.contains("== 0\n  S -> • NP VP [0]\n  NP -> • \"det\" N [0]\n"));
        assert!(out.contains("== 1 (the)\n  NP -> \"det\" • N [0]\n  N -> • \"n\" [1]\n"));
    }
}
