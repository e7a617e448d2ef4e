use crate::grammar::{Grammar, Symbol};
use crate::lexicon::Token;
use crate::recognizer::Chart;

/// A completed span of input: either a single token, or production `rule`
/// matched from some start column up to `finish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Token { finish: usize },
    Rule { rule: usize, finish: usize },
}

impl Edge {
    fn finish(&self) -> usize {
        match self {
            Edge::Token { finish } | Edge::Rule { finish, .. } => *finish,
        }
    }
}

/// A parse tree:
/// - `Leaf` is a token read under one of its categories.
/// - `Node` is a nonterminal expanded by production `rule`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree<'gr, 'inp> {
    Leaf {
        category: &'gr str,
        token: Token<'inp>,
    },
    Node {
        lhs: &'gr str,
        rule: usize,
        children: Vec<ParseTree<'gr, 'inp>>,
    },
}

impl<'gr, 'inp> ParseTree<'gr, 'inp> {
    pub fn label(&self) -> &'gr str {
        match self {
            ParseTree::Leaf { category, .. } => *category,
            ParseTree::Node { lhs, .. } => *lhs,
        }
    }

    /// Words covered by this tree, left to right.
    pub fn words(&self) -> Vec<&'inp str> {
        match self {
            ParseTree::Leaf { token, .. } => vec![token.text],
            ParseTree::Node { children, .. } => children.iter().flat_map(|c| c.words()).collect(),
        }
    }

    /// Indented, one node per line.
    pub fn pretty_print(&self, indent: usize) -> String {
        let padding = "  ".repeat(indent);
        match self {
            ParseTree::Leaf { category, token } => format!("{}{} {}\n", padding, category, token.text),
            ParseTree::Node { lhs, children, .. } => {
                let mut out = format!("{}{}\n", padding, lhs);
                for child in children {
                    out.push_str(&child.pretty_print(indent + 1));
                }
                out
            }
        }
    }
}

/// Bracketed form, e.g. `(S (NP (det the) (N (n student))) (VP (vi sat)))`.
impl std::fmt::Display for ParseTree<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseTree::Leaf { category, token } => write!(f, "({} {})", category, token.text),
            ParseTree::Node { lhs, children, .. } => {
                write!(f, "({}", lhs)?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

struct TreeBuilder<'c, 'gr, 'inp> {
    grammar: &'gr Grammar<'gr>,
    tokens: &'c [Token<'inp>],
    /// Completed rule edges indexed by start column.
    edges: Vec<Vec<Edge>>,
    /// (rule, start, finish) of the nodes being expanded, to cut unit cycles.
    path: Vec<(usize, usize, usize)>,
}

impl<'c, 'gr, 'inp> TreeBuilder<'c, 'gr, 'inp> {
    fn edges_from(&self, depth: usize, symbols: &[Symbol<'gr>], start: usize) -> Vec<Edge> {
        match symbols[depth] {
            Symbol::Terminal(cat) => match self.tokens.get(start) {
                Some(tok) if tok.has_category(cat) => vec![Edge::Token { finish: start + 1 }],
                _ => Vec::new(),
            },
            Symbol::NonTerminal(name) => self
                .edges
                .get(start)
                .map(|edges| {
                    edges
                        .iter()
                        .filter(|e| match e {
                            Edge::Rule { rule, .. } => self.grammar.production(*rule).lhs == name,
                            Edge::Token { .. } => false,
                        })
                        .copied()
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
        }
    }

    /// Matches `symbols[depth..]` from `start` to exactly `finish`.
    fn children(
        &mut self,
        symbols: &[Symbol<'gr>],
        depth: usize,
        start: usize,
        finish: usize,
    ) -> Option<Vec<ParseTree<'gr, 'inp>>> {
        if depth == symbols.len() {
            return (start == finish).then(Vec::new);
        }
        for edge in self.edges_from(depth, symbols, start) {
            if edge.finish() > finish {
                continue;
            }
            let Some(child) = self.build(symbols[depth], start, edge) else {
                continue;
            };
            if let Some(mut rest) = self.children(symbols, depth + 1, edge.finish(), finish) {
                rest.insert(0, child);
                return Some(rest);
            }
        }
        None
    }

    fn build(&mut self, sym: Symbol<'gr>, start: usize, edge: Edge) -> Option<ParseTree<'gr, 'inp>> {
        match edge {
            Edge::Token { .. } => Some(ParseTree::Leaf {
                category: sym.name(),
                token: self.tokens[start].clone(),
            }),
            Edge::Rule { rule, finish } => {
                let key = (rule, start, finish);
                if self.path.contains(&key) {
                    return None;
                }
                self.path.push(key);
                let grammar = self.grammar;
                let prod = grammar.production(rule);
                let children = self.children(&prod.rhs, 0, start, finish);
                self.path.pop();
                Some(ParseTree::Node {
                    lhs: prod.lhs,
                    rule,
                    children: children?,
                })
            }
        }
    }
}

impl<'gr, 'inp> Chart<'gr, 'inp> {
    /// Completed items as edges, grouped by origin and sorted.
    pub fn completed_edges(&self) -> Vec<Vec<Edge>> {
        let grammar = self.grammar;
        let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); self.columns.len()];
        for column in &self.columns {
            for item in column.items() {
                if item.is_complete(grammar) {
                    edges[item.origin].push(Edge::Rule {
                        rule: item.prod_id,
                        finish: column.index,
                    });
                }
            }
        }
        for list in &mut edges {
            list.sort_by_key(|e| match e {
                Edge::Rule { rule, finish } => (*rule, *finish),
                Edge::Token { finish } => (usize::MAX, *finish),
            });
        }
        edges
    }

    /// One derivation of the whole input from the start symbol, if accepted.
    pub fn build_parse_tree(&self) -> Option<ParseTree<'gr, 'inp>> {
        let grammar = self.grammar;
        let finish = self.tokens.len();
        let mut builder = TreeBuilder {
            grammar,
            tokens: &self.tokens,
            edges: self.completed_edges(),
            path: Vec::new(),
        };
        let top: Vec<Edge> = builder
            .edges
            .first()?
            .iter()
            .filter(|e| match e {
                Edge::Rule { rule, finish: f } => {
                    *f == finish && grammar.production(*rule).lhs == grammar.start
                }
                Edge::Token { .. } => false,
            })
            .copied()
            .collect();
        top.into_iter()
            .find_map(|edge| builder.build(Symbol::NonTerminal(grammar.start), 0, edge))
    }
}
