/*
    This module is for storing and manipulating grammars
*/

mod pool;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use itertools::Itertools;

pub use pool::{SymbolPool, ALPHABET_SIZE};

// The base unit in a grammar rule
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(char),
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn nonterminal(&self) -> Option<char> {
        match self {
            Symbol::Nonterminal(c) => Some(*c),
            Symbol::Terminal(_) => None,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Terminal(c) | Symbol::Nonterminal(c) => write!(f, "{}", c),
        }
    }
}

// The symbols in a single alternative
pub type Alternative = Vec<Symbol>;

// The alternatives of a rewrite rule, without duplicates
pub type Rewrite = BTreeSet<Alternative>;

pub type Rules = BTreeMap<char, Rewrite>;

/// A context-free grammar over single-letter symbols.
///
/// Every nonterminal that shows up anywhere in the grammar has an entry in
/// `rules` (possibly empty) and is reserved in `pool`. Empty alternatives are
/// never stored; a nonterminal that derives the empty string is listed in
/// `nullable` instead.
#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    pub start_symbol: char,
    pub rules: Rules,
    pub nullable: BTreeSet<char>,
    pub pool: SymbolPool,
}

impl Grammar {
    pub fn new(start_symbol: char) -> Self {
        let mut grammar = Grammar {
            start_symbol,
            rules: Rules::new(),
            nullable: BTreeSet::new(),
            pool: SymbolPool::new(),
        };
        grammar.declare(start_symbol);
        grammar
    }

    pub fn set_start_symbol(&mut self, start_symbol: char) {
        self.declare(start_symbol);
        self.start_symbol = start_symbol;
    }

    // Gives the nonterminal an entry and takes its identifier out of the pool
    fn declare(&mut self, nonterminal: char) {
        debug_assert!(nonterminal.is_ascii_uppercase(), "`{}` is not a nonterminal", nonterminal);
        self.pool.reserve(nonterminal);
        self.rules.entry(nonterminal).or_default();
    }

    /// Adds `lhs -> alternative`. An empty alternative marks `lhs` nullable.
    pub fn add_rule(&mut self, lhs: char, alternative: Alternative) {
        self.declare(lhs);
        for nonterminal in alternative.iter().filter_map(Symbol::nonterminal) {
            self.declare(nonterminal);
        }

        if alternative.is_empty() {
            self.nullable.insert(lhs);
        } else {
            self.insert(lhs, alternative);
        }
    }

    // Returns true if the alternative was not already there
    pub fn insert(&mut self, lhs: char, alternative: Alternative) -> bool {
        self.rules.entry(lhs).or_default().insert(alternative)
    }

    pub fn rewrite(&self, lhs: char) -> Option<&Rewrite> {
        self.rules.get(&lhs)
    }

    pub fn is_nullable(&self, nonterminal: char) -> bool {
        self.nullable.contains(&nonterminal)
    }

    pub fn production_count(&self) -> usize {
        self.rules.values().map(BTreeSet::len).sum()
    }

    /// Checks the Chomsky normal form shape: every alternative is a single
    /// terminal or exactly two nonterminals.
    pub fn is_normalized(&self) -> bool {
        self.rules.values().flatten().all(|alternative| match alternative[..] {
            [Symbol::Terminal(_)] => true,
            [Symbol::Nonterminal(_), Symbol::Nonterminal(_)] => true,
            _ => false,
        })
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines = self.rules.iter()
            .flat_map(|(lhs, rewrite)| rewrite.iter()
                .map(move |alternative| format!("{}->{}", lhs, alternative.iter().join(""))))
            .chain(self.nullable.iter().map(|lhs| format!("{}->e", lhs)));

        write!(f, "{}", lines.format("\n"))
    }
}
