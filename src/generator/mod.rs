/*
    This module generates random words from a grammar
*/

use rand::prelude::*;
use std::fmt::Display;

use log::trace;

use crate::grammar::*;
use crate::error_handling::*;

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // A nonterminal with no way to derive anything was reached
    UndefinedNonterminal(char),
    // The derivation got deeper than allowed
    DepthExceeded,
    // The word got longer than allowed
    TooLong,
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::UndefinedNonterminal(nonterminal) => write!(f, "No rules for nonterminal `{}`", nonterminal),
            GenerateErrorType::DepthExceeded => write!(f, "Derivation exceeded the depth limit"),
            GenerateErrorType::TooLong => write!(f, "Word exceeded the length limit"),
        }
    }
}

pub type GenResult = Result<String, GenerateErrorType>;

// How many derivations in a row may fail before a word is given up on
const ATTEMPTS_PER_WORD: usize = 64;

/// Bounds on a single derivation.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_depth: usize,
    pub max_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_depth: 24, max_length: 32 }
    }
}

// Generates a word in the given grammar from its start symbol
pub fn generate(grammar: &Grammar, rng: &mut impl Rng, limits: Limits) -> GenResult {
    generate_with_override(grammar, grammar.start_symbol, rng, limits)
}

// Generates a word in the given grammar starting with the given symbol
pub fn generate_with_override(grammar: &Grammar, start: char, rng: &mut impl Rng, limits: Limits) -> GenResult {
    let mut word = String::new();
    generate_nonterminal(start, grammar, rng, limits, 0, &mut word)?;
    return Ok(word);
}

/// An endless stream of random words. It ends early once a word takes more
/// than `ATTEMPTS_PER_WORD` derivations that break the limits.
pub struct Samples<'g, R> {
    grammar: &'g Grammar,
    rng: R,
    limits: Limits,
}

impl<'g, R: Rng> Iterator for Samples<'g, R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for _ in 0..ATTEMPTS_PER_WORD {
            match generate(self.grammar, &mut self.rng, self.limits) {
                Ok(word) => return Some(word),
                Err(error) => trace!("discarded derivation: {}", error),
            }
        }
        None
    }
}

pub fn samples<R: Rng>(grammar: &Grammar, rng: R, limits: Limits) -> Samples<'_, R> {
    Samples { grammar, rng, limits }
}

/// Draws up to `amount` words, skipping derivations that break the limits.
/// Fewer words come back when the grammar rarely derives anything in bounds.
pub fn sample(grammar: &Grammar, rng: &mut impl Rng, amount: usize, limits: Limits) -> Vec<String> {
    samples(grammar, rng, limits).take(amount).collect()
}

fn generate_nonterminal(nonterminal: char, grammar: &Grammar, rng: &mut impl Rng, limits: Limits, depth: usize, word: &mut String) -> Result<(), GenerateErrorType> {
    if depth >= limits.max_depth {
        return Err(GenerateErrorType::DepthExceeded);
    }

    let rewrite = grammar
        .rewrite(nonterminal)
        .ok_or(GenerateErrorType::UndefinedNonterminal(nonterminal))?;

    // A nullable nonterminal gets one extra choice, which derives nothing
    let choices = rewrite.len() + usize::from(grammar.is_nullable(nonterminal));
    if choices == 0 {
        return Err(GenerateErrorType::UndefinedNonterminal(nonterminal));
    }

    let alternative = match rewrite.iter().nth(rng.gen_range(0..choices)) {
        Some(a) => a,
        None => return Ok(()),
    };

    for symbol in alternative {
        match *symbol {
            Symbol::Terminal(c) => {
                word.push(c);
                if word.len() > limits.max_length {
                    return Err(GenerateErrorType::TooLong);
                }
            }
            Symbol::Nonterminal(n) => generate_nonterminal(n, grammar, rng, limits, depth + 1, word)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;

    use super::*;
    use crate::checker::MembershipChecker;
    use crate::normalizer::normalize;
    use Symbol::*;

    fn symbols(rhs: &str) -> Alternative {
        rhs.chars()
            .map(|c| if c.is_ascii_uppercase() { Nonterminal(c) } else { Terminal(c) })
            .collect()
    }

    fn grammar(rules: &[(char, &str)]) -> Grammar {
        let mut grammar = Grammar::new(rules[0].0);
        for &(lhs, rhs) in rules {
            grammar.add_rule(lhs, symbols(rhs));
        }
        grammar
    }

    #[test]
    fn generated_words_are_in_the_language() {
        let g = grammar(&[('S', "aSb"), ('S', "")]);
        let mut rng = StdRng::seed_from_u64(7);

        let words = sample(&g, &mut rng, 20, Limits::default());
        assert_eq!(words.len(), 20);
        for word in words {
            let half = word.len() / 2;
            assert_eq!(word, format!("{}{}", "a".repeat(half), "b".repeat(half)));
        }
    }

    #[test]
    fn dead_start_symbol() {
        let g = Grammar::new('S');
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generate(&g, &mut rng, Limits::default()), Err(GenerateErrorType::UndefinedNonterminal('S')));
        assert!(sample(&g, &mut rng, 3, Limits::default()).is_empty());
    }

    #[test]
    fn huge_amount_from_a_dead_grammar() {
        // `A` has no rules, so nothing is ever derived
        let g = grammar(&[('S', "A")]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample(&g, &mut rng, usize::MAX, Limits::default()).is_empty());
    }

    #[test]
    fn huge_amount_is_streamed() {
        let g = grammar(&[('S', "a")]);
        let words = samples(&g, StdRng::seed_from_u64(1), Limits::default())
            .take(5)
            .collect::<Vec<_>>();
        assert_eq!(words, vec!["a"; 5]);
    }

    #[test]
    fn depth_limit_stops_runaway_recursion() {
        let g = grammar(&[('S', "aS")]);
        let mut rng = StdRng::seed_from_u64(3);
        let limits = Limits { max_depth: 5, max_length: 100 };
        assert_eq!(generate(&g, &mut rng, limits), Err(GenerateErrorType::DepthExceeded));
    }

    #[test]
    fn length_limit() {
        let g = grammar(&[('S', "aaaa")]);
        let mut rng = StdRng::seed_from_u64(3);
        let limits = Limits { max_depth: 5, max_length: 3 };
        assert_eq!(generate(&g, &mut rng, limits), Err(GenerateErrorType::TooLong));
    }

    #[test]
    fn override_start_symbol() {
        let g = grammar(&[('S', "AB"), ('A', "a"), ('B', "b")]);
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(generate_with_override(&g, 'B', &mut rng, Limits::default()), Ok("b".to_string()));
    }

    // Words derived from the original grammar must survive normalization
    #[test]
    fn normalization_keeps_sampled_words() {
        let grammars = vec![
            grammar(&[('S', "aSbS"), ('S', ""), ('S', "c")]),
            grammar(&[('S', "ABC"), ('A', "aA"), ('A', ""), ('B', "b"), ('B', "C"), ('C', "cC"), ('C', "c")]),
            grammar(&[('E', "EpT"), ('E', "T"), ('T', "TmF"), ('T', "F"), ('F', "lEr"), ('F', "x")]),
            grammar(&[('S', "A"), ('A', "B"), ('B', "S"), ('B', "bb"), ('A', "aSa")]),
        ];
        let mut rng = StdRng::seed_from_u64(42);

        for original in grammars {
            let mut normalized = original.clone();
            normalize(&mut normalized).unwrap();
            assert!(normalized.is_normalized());

            let checker = MembershipChecker::new(&normalized);
            for word in sample(&original, &mut rng, 30, Limits::default()) {
                assert!(checker.parse(&word), "lost {:?} from\n{}", word, original);
            }
        }
    }

    // Every word of this language has as many `a`s as `b`s
    #[test]
    fn normal_form_derives_only_original_words() {
        let original = grammar(&[('S', "aSbS"), ('S', ""), ('S', "c")]);
        let mut normalized = original.clone();
        normalize(&mut normalized).unwrap();

        let checker = MembershipChecker::new(&normalized);
        let mut rng = StdRng::seed_from_u64(5);
        for word in sample(&normalized, &mut rng, 30, Limits::default()) {
            assert!(checker.parse(&word));
            assert_eq!(word.matches('a').count(), word.matches('b').count());
        }
    }
}
