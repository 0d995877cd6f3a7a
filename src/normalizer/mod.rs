/*
    This module rewrites grammars into Chomsky normal form
*/

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::Display;

use itertools::Itertools;
use log::debug;

use crate::error_handling::*;
use crate::grammar::*;

#[derive(Debug, PartialEq)]
pub enum NormalizeErrorType {
    // Every nonterminal identifier is taken, so no fresh one can be made.
    // The string says what the fresh nonterminal was needed for
    AlphabetExhausted(String),
}

impl ErrorType for NormalizeErrorType {}

impl Display for NormalizeErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeErrorType::AlphabetExhausted(purpose) => write!(
                f,
                "All {} nonterminal identifiers are in use, no room for a new one standing for {}",
                ALPHABET_SIZE,
                purpose
            ),
        }
    }
}

pub type NormalizeError = Error<NormalizeErrorType>;
pub type NormalizeResult<T> = std::result::Result<T, NormalizeErrorType>;

fn fresh_symbol(pool: &mut SymbolPool, purpose: impl FnOnce() -> String) -> NormalizeResult<char> {
    pool.fresh().ok_or_else(|| NormalizeErrorType::AlphabetExhausted(purpose()))
}

/// Brings the grammar into Chomsky normal form in place. The empty string is
/// only tracked through `grammar.nullable` afterwards.
pub fn normalize(grammar: &mut Grammar) -> NormalizeResult<()> {
    debug!("normalizing {} productions", grammar.production_count());
    delete_long_rules(grammar)?;
    delete_epsilon(grammar);
    delete_chain_rules(grammar);
    delete_multiple_terminals(grammar)?;
    debug!("normal form has {} productions, {} identifiers left", grammar.production_count(), grammar.pool.remaining());
    Ok(())
}

/// Splits every alternative longer than two symbols into a chain of
/// two-symbol alternatives joined by fresh nonterminals.
pub fn delete_long_rules(grammar: &mut Grammar) -> NormalizeResult<()> {
    let mut rules = Rules::new();
    let mut queue = VecDeque::new();

    for (&lhs, rewrite) in &grammar.rules {
        let kept = rules.entry(lhs).or_insert_with(Rewrite::new);
        for alternative in rewrite {
            if alternative.len() > 2 {
                queue.push_back((lhs, alternative.clone()));
            } else {
                kept.insert(alternative.clone());
            }
        }
    }

    let mut introduced = 0;
    while let Some((lhs, alternative)) = queue.pop_front() {
        if alternative.len() > 2 {
            let suffix = alternative[1..].to_vec();
            let fresh = fresh_symbol(&mut grammar.pool, || format!("suffix `{}`", suffix.iter().join("")))?;
            introduced += 1;

            rules.entry(lhs).or_default().insert(vec![alternative[0], Symbol::Nonterminal(fresh)]);
            queue.push_back((fresh, suffix));
        } else {
            rules.entry(lhs).or_default().insert(alternative);
        }
    }

    debug!("long rules: introduced {} nonterminals", introduced);
    grammar.rules = rules;
    Ok(())
}

/// Computes every nonterminal that derives the empty string, starting from
/// the ones already marked and iterating until nothing changes.
pub fn find_nullable(grammar: &Grammar) -> BTreeSet<char> {
    let mut nullable = grammar.nullable.clone();
    let mut changed = true;

    while changed {
        changed = false;
        for (&lhs, rewrite) in &grammar.rules {
            if nullable.contains(&lhs) {
                continue;
            }
            let vanishes = rewrite.iter().any(|alternative| {
                alternative.iter().all(|symbol| symbol.nonterminal().is_some_and(|n| nullable.contains(&n)))
            });
            if vanishes {
                nullable.insert(lhs);
                changed = true;
            }
        }
    }

    nullable
}

// Every non-empty alternative obtained by dropping a non-empty subset of the
// nullable positions
fn without_nullable(alternative: &Alternative, nullable: &BTreeSet<char>) -> Vec<Alternative> {
    let positions = alternative.iter()
        .positions(|symbol| symbol.nonterminal().is_some_and(|n| nullable.contains(&n)))
        .collect_vec();

    (1..1u32 << positions.len())
        .map(|mask| {
            alternative.iter()
                .enumerate()
                .filter(|(i, _)| match positions.iter().position(|p| p == i) {
                    Some(bit) => mask & (1 << bit) == 0,
                    None => true,
                })
                .map(|(_, symbol)| *symbol)
                .collect_vec()
        })
        .filter(|shortened| !shortened.is_empty())
        .collect()
}

/// Marks every nullable nonterminal and adds the alternatives that appear
/// when nullable symbols vanish. No empty alternative is ever stored.
pub fn delete_epsilon(grammar: &mut Grammar) {
    let nullable = find_nullable(grammar);
    let mut rules = grammar.rules.clone();
    let mut added = 0;

    for (lhs, rewrite) in &grammar.rules {
        let extended = rules.entry(*lhs).or_default();
        for alternative in rewrite {
            for shortened in without_nullable(alternative, &nullable) {
                if extended.insert(shortened) {
                    added += 1;
                }
            }
        }
    }

    debug!("empty rules: {} nullable nonterminals, {} alternatives added", nullable.len(), added);
    grammar.rules = rules;
    grammar.nullable = nullable;
}

fn chain_target(alternative: &Alternative) -> Option<char> {
    match alternative[..] {
        [Symbol::Nonterminal(target)] => Some(target),
        _ => None,
    }
}

// Collects the non-chain alternatives of every nonterminal reachable from
// `start` through chain rules, `start` included
fn resolve_chain_rules(rules: &Rules, start: char) -> Rewrite {
    let mut queue = VecDeque::from([start]);
    let mut seen = BTreeSet::from([start]);
    let mut resolved = Rewrite::new();

    while let Some(current) = queue.pop_front() {
        for alternative in rules.get(&current).into_iter().flatten() {
            match chain_target(alternative) {
                Some(target) => {
                    if seen.insert(target) {
                        queue.push_back(target);
                    }
                }
                None => {
                    resolved.insert(alternative.clone());
                }
            }
        }
    }

    resolved
}

/// Replaces every alternative made of a single nonterminal with the
/// alternatives that nonterminal reaches.
pub fn delete_chain_rules(grammar: &mut Grammar) {
    let rules: Rules = grammar.rules.keys()
        .map(|&lhs| (lhs, resolve_chain_rules(&grammar.rules, lhs)))
        .collect();

    debug!("chain rules: {} -> {} productions", grammar.production_count(), rules.values().map(BTreeSet::len).sum::<usize>());
    grammar.rules = rules;
}

fn wrap_terminal(terminal: char, wrappers: &mut BTreeMap<char, char>, pool: &mut SymbolPool) -> NormalizeResult<char> {
    if let Some(&wrapper) = wrappers.get(&terminal) {
        return Ok(wrapper);
    }
    let wrapper = fresh_symbol(pool, || format!("terminal `{}`", terminal))?;
    wrappers.insert(terminal, wrapper);
    Ok(wrapper)
}

/// Swaps terminals inside two-symbol alternatives for nonterminals that
/// derive only that terminal. One such nonterminal is made per terminal.
pub fn delete_multiple_terminals(grammar: &mut Grammar) -> NormalizeResult<()> {
    let mut wrappers = BTreeMap::new();
    let mut rules = Rules::new();

    for (&lhs, rewrite) in &grammar.rules {
        let mut isolated = Rewrite::new();
        for alternative in rewrite {
            if alternative.len() == 2 && alternative.iter().any(Symbol::is_terminal) {
                let wrapped = alternative.iter()
                    .map(|symbol| match *symbol {
                        Symbol::Terminal(c) => wrap_terminal(c, &mut wrappers, &mut grammar.pool).map(Symbol::Nonterminal),
                        nonterminal => Ok(nonterminal),
                    })
                    .collect::<NormalizeResult<Alternative>>()?;
                isolated.insert(wrapped);
            } else {
                isolated.insert(alternative.clone());
            }
        }
        rules.insert(lhs, isolated);
    }

    debug!("terminals: {} wrapped", wrappers.len());
    for (terminal, wrapper) in wrappers {
        rules.entry(wrapper).or_default().insert(vec![Symbol::Terminal(terminal)]);
    }
    grammar.rules = rules;
    Ok(())
}
