use std::collections::BTreeSet;

use log::warn;

use super::{Location, Rule};
use crate::grammar::Symbol;

// Nonterminals are defined by having a rule for them, even an empty one
fn defined_nonterminals(rules: &[Rule]) -> BTreeSet<char> {
    rules.iter().map(|rule| rule.symbol).collect()
}

/// Finds every right-hand side nonterminal that no rule defines, with the
/// location of the rule using it.
pub fn get_undefined_symbols(rules: &[Rule]) -> Vec<(Location, char)> {
    let defined = &defined_nonterminals(rules);

    rules.iter()
        .flat_map(|rule| rule.alternative.iter()
            .filter_map(Symbol::nonterminal)
            .filter(move |symbol| !defined.contains(symbol))
            .map(move |symbol| (rule.location.clone(), symbol)))
        .collect()
}

// Undefined nonterminals derive nothing, which is legal, so they are only
// worth a warning
pub fn verify_rules(rules: &[Rule]) {
    for (location, symbol) in get_undefined_symbols(rules) {
        warn!("[{}] `{}` has no rules and derives nothing", location, symbol);
    }
}
