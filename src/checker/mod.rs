/*
    This module decides whether words belong to a grammar in Chomsky normal form
*/

use std::collections::HashMap;

use log::trace;

use crate::grammar::*;

/// Cocke-Younger-Kasami recognizer over a normalized grammar.
///
/// Nonterminals are resolved to table rows once, so filling the table never
/// looks a symbol up.
pub struct MembershipChecker<'a> {
    grammar: &'a Grammar,
    // lhs row -> terminal
    terminal_rules: Vec<(usize, char)>,
    // lhs row -> (left row, right row)
    binary_rules: Vec<(usize, usize, usize)>,
    // Row of the start symbol
    start: Option<usize>,
    row_count: usize,
}

impl<'a> MembershipChecker<'a> {
    pub fn new(grammar: &'a Grammar) -> Self {
        debug_assert!(grammar.is_normalized(), "the grammar has not been normalized");

        let rows: HashMap<char, usize> = grammar.rules.keys().enumerate().map(|(row, &lhs)| (lhs, row)).collect();

        let mut terminal_rules = Vec::new();
        let mut binary_rules = Vec::new();
        for (&lhs, rewrite) in &grammar.rules {
            let lhs_row = rows[&lhs];
            for alternative in rewrite {
                match alternative[..] {
                    [Symbol::Terminal(c)] => terminal_rules.push((lhs_row, c)),
                    [Symbol::Nonterminal(left), Symbol::Nonterminal(right)] => {
                        // Every nonterminal owns an entry, but a missing one derives nothing anyway
                        if let (Some(&left_row), Some(&right_row)) = (rows.get(&left), rows.get(&right)) {
                            binary_rules.push((lhs_row, left_row, right_row));
                        }
                    }
                    _ => {}
                }
            }
        }

        MembershipChecker {
            grammar,
            terminal_rules,
            binary_rules,
            start: rows.get(&grammar.start_symbol).copied(),
            row_count: rows.len(),
        }
    }

    /// Returns true if the start symbol derives `word`.
    pub fn parse(&self, word: &str) -> bool {
        let word: Vec<char> = word.chars().collect();
        let n = word.len();
        if n == 0 {
            return self.grammar.is_nullable(self.grammar.start_symbol);
        }
        let start = match self.start {
            Some(row) => row,
            None => return false,
        };

        // spans[row][i][j]: the nonterminal of `row` derives word[i..=j]
        let mut spans = vec![vec![vec![false; n]; n]; self.row_count];

        for (i, &c) in word.iter().enumerate() {
            for &(lhs, terminal) in &self.terminal_rules {
                if terminal == c {
                    spans[lhs][i][i] = true;
                }
            }
        }

        for length in 2..=n {
            for i in 0..=n - length {
                let j = i + length - 1;
                for k in i..j {
                    for &(lhs, left, right) in &self.binary_rules {
                        if spans[left][i][k] && spans[right][k + 1][j] {
                            spans[lhs][i][j] = true;
                        }
                    }
                }
            }
        }

        let accepted = spans[start][0][n - 1];
        trace!("{:?} -> {}", word.iter().collect::<String>(), accepted);
        accepted
    }

    pub fn parse_all<'w>(&self, words: impl IntoIterator<Item = &'w str>) -> Vec<bool> {
        words.into_iter().map(|word| self.parse(word)).collect()
    }
}
