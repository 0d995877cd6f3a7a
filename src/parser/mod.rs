/*
    This module reads grammars and the words to check against them
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::PathBuf;

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use log::debug;
use verifier::verify_rules;

// The start symbol when the input has no rules at all
pub const DEFAULT_START: char = 'S';

// Written as the whole right-hand side, this stands for the empty string
pub const EMPTY_MARKER: char = 'e';

#[derive(Debug)]
pub enum CompileErrorType {
    // A rule line has no `->` after its nonterminal
    MissingArrow,
    // A rule has more than one `->`
    UnexpectedArrow,
    // The user starts a rule line with something other than a nonterminal
    MissingNonterminal,
    // A character that is neither a letter nor part of `->`
    InvalidSymbol(char),
    // A blank line where a rule was expected
    UnexpectedBlankLine,
    // The input ended before the named count was given
    MissingCount(&'static str),
    // A count line does not hold a number
    InvalidCount(String),
    // The input ended before all the promised lines were read
    MissingLines { what: &'static str, expected: usize, found: usize },
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (CompileErrorType::InvalidSymbol(a), CompileErrorType::InvalidSymbol(b)) => a == b,
            (CompileErrorType::MissingCount(a), CompileErrorType::MissingCount(b)) => a == b,
            (CompileErrorType::InvalidCount(a), CompileErrorType::InvalidCount(b)) => a == b,
            (
                CompileErrorType::MissingLines { what: a, expected: x, found: y },
                CompileErrorType::MissingLines { what: b, expected: z, found: w }
            ) => a == b && x == z && y == w,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingArrow => write!(f, "Expected `->` after nonterminal"),
            CompileErrorType::UnexpectedArrow => write!(f, "Unexpected `->` encountered"),
            CompileErrorType::MissingNonterminal => write!(f, "Tried to define something other than a single nonterminal"),
            CompileErrorType::InvalidSymbol(c) => write!(f, "`{}` is not a grammar symbol", c),
            CompileErrorType::UnexpectedBlankLine => write!(f, "Expected a rule, found a blank line"),
            CompileErrorType::MissingCount(what) => write!(f, "Expected the number of {}s", what),
            CompileErrorType::InvalidCount(text) => write!(f, "`{}` is not a count", text),
            CompileErrorType::MissingLines { what, expected, found } => write!(f, "Expected {} {}s, found {}", expected, what, found),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> CompileError {
    CompileError {
        location: Location::whole(file),
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

#[derive(PartialEq, Debug)]
pub struct Rule {
    symbol: char,
    alternative: Alternative,
    location: Location
}

/// A grammar together with the words to check against it, in input order.
#[derive(PartialEq, Debug)]
pub struct Problem {
    pub grammar: Grammar,
    pub words: Vec<String>
}

fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    if let [Token::Terminal(EMPTY_MARKER)] = tokens {
        return Ok(Vec::new());
    }

    tokens.iter().map(|t| match t {
        Token::Arrow => Err(CompileErrorType::UnexpectedArrow),
        Token::Nonterminal(c) => Ok(Symbol::Nonterminal(*c)),
        Token::Terminal(c) => Ok(Symbol::Terminal(*c))
    }).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let symbol = match tokens.first() {
        Some(Token::Nonterminal(c)) => Ok(*c),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    match tokens.get(1) {
        Some(Token::Arrow) => {}
        Some(Token::Nonterminal(_)) => return Err(CompileErrorType::MissingNonterminal),
        _ => return Err(CompileErrorType::MissingArrow)
    }

    let alternative = parse_alternative(&tokens[2..])?;

    return Ok(Rule {
        symbol,
        alternative,
        location
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location, error })
}

// Returns an iterator over the lines of the input, with the io errors
// wrapped in CompileError and numbered from 1
fn numbered_lines(reader: impl BufRead, path: &PathBuf) -> impl Iterator<Item = (usize, LineResult<String>)> {
    let path = path.clone();
    reader
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path.clone())))
        .enumerate()
        .map(|(num, line)| (num + 1, line))
}

fn read_count(lines: &mut impl Iterator<Item = (usize, LineResult<String>)>, path: &PathBuf, what: &'static str) -> LineResult<usize> {
    let (num, line) = lines.next().ok_or_else(|| CompileError {
        location: Location::whole(path.clone()),
        error: CompileErrorType::MissingCount(what)
    })?;
    let line = line?;

    line.trim().parse().map_err(|_| CompileError {
        location: Location { file: path.clone(), line: num },
        error: CompileErrorType::InvalidCount(line.trim().to_string())
    })
}

fn read_lines(lines: &mut impl Iterator<Item = (usize, LineResult<String>)>, path: &PathBuf, what: &'static str, expected: usize) -> LineResult<Vec<(usize, String)>> {
    let read = lines.by_ref()
        .take(expected)
        .map(|(num, line)| line.map(|line| (num, line)))
        .collect::<LineResult<Vec<_>>>()?;

    if read.len() < expected {
        return Err(CompileError {
            location: Location::whole(path.clone()),
            error: CompileErrorType::MissingLines { what, expected, found: read.len() }
        });
    }

    Ok(read)
}

fn grammar_from_rules(rules: &[Rule]) -> Grammar {
    let start_symbol = rules.first().map_or(DEFAULT_START, |rule| rule.symbol);

    verify_rules(rules);

    let mut grammar = Grammar::new(start_symbol);
    for rule in rules {
        grammar.add_rule(rule.symbol, rule.alternative.clone());
    }

    return grammar;
}

/// Reads a rule count, a word count, the rules and then the words. Every
/// malformed rule is reported, not just the first one.
pub fn parse_reader(reader: impl BufRead, path: &PathBuf) -> FileResult<Problem> {
    let mut lines = numbered_lines(reader, path);

    let rule_count = read_count(&mut lines, path, "rule").map_err(|e| vec![e])?;
    let word_count = read_count(&mut lines, path, "word").map_err(|e| vec![e])?;
    let rule_lines = read_lines(&mut lines, path, "rule", rule_count).map_err(|e| vec![e])?;
    let word_lines = read_lines(&mut lines, path, "word", word_count).map_err(|e| vec![e])?;

    let (rules, errors): (Vec<_>, Vec<_>) = rule_lines.iter()
        .map(|(num, line)| parse_lex_line(line, Location {
            file: path.clone(),
            line: *num
        }))
        .partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    let grammar = grammar_from_rules(&rules);
    debug!("read {} rules for start symbol `{}`", rules.len(), grammar.start_symbol);

    let words = word_lines.into_iter().map(|(_, word)| word.trim().to_string()).collect_vec();

    return Ok(Problem {
        grammar,
        words
    });
}

pub fn parse_file(path: &PathBuf) -> FileResult<Problem> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.clone())])?;
    parse_reader(std::io::BufReader::new(file), path)
}

pub fn parse_stdin() -> FileResult<Problem> {
    parse_reader(std::io::stdin().lock(), &Location::stdin())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    impl Location {
        pub fn new() -> Self {
            Location {
                file: PathBuf::new(),
                line: 0
            }
        }
    }

    fn parse_str(text: &str) -> FileResult<Problem> {
        parse_reader(Cursor::new(text.as_bytes()), &PathBuf::new())
    }

    #[test]
    fn parse_normal_alternative() {
        assert_eq!(
            parse_alternative(&[Token::Nonterminal('A'), Token::Terminal('b')]).unwrap(),
            vec![Symbol::Nonterminal('A'), Symbol::Terminal('b')]
        );
        assert_eq!(parse_alternative(&[Token::Terminal('e')]).unwrap(), Alternative::new());
        assert_eq!(parse_alternative(&[]).unwrap(), Alternative::new());
    }

    #[test]
    fn empty_marker_only_counts_alone() {
        assert_eq!(
            parse_alternative(&[Token::Terminal('e'), Token::Terminal('e')]).unwrap(),
            vec![Symbol::Terminal('e'), Symbol::Terminal('e')]
        );
    }

    #[test]
    fn parse_malformed_alternative() {
        assert_eq!(parse_alternative(&[Token::Arrow]), Err(CompileErrorType::UnexpectedArrow));
    }

    #[test]
    fn parse_malformed_line() {
        // Blank
        assert_eq!(parse_line(&[], Location::new()), Err(CompileErrorType::UnexpectedBlankLine));

        // Missing arrow
        assert_eq!(parse_line(
            &lexer::lex_line("S ab").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingArrow));
        assert_eq!(parse_line(
            &lexer::lex_line("S").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingArrow));

        // Improper definition
        assert_eq!(parse_line(
            &lexer::lex_line("a->AB").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingNonterminal));
        assert_eq!(parse_line(
            &lexer::lex_line("SA->b").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingNonterminal));
        assert_eq!(parse_line(
            &lexer::lex_line("->b").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::MissingNonterminal));

        // Two arrows
        assert_eq!(parse_line(
            &lexer::lex_line("S->A->b").unwrap()[..],
            Location::new()
        ), Err(CompileErrorType::UnexpectedArrow));
    }

    #[test]
    fn parse_normal_input() {
        let problem = parse_str("3\n2\nS->AB\nA->a\nB->b\nab\nba\n").unwrap();

        let mut grammar = Grammar::new('S');
        grammar.add_rule('S', vec![Symbol::Nonterminal('A'), Symbol::Nonterminal('B')]);
        grammar.add_rule('A', vec![Symbol::Terminal('a')]);
        grammar.add_rule('B', vec![Symbol::Terminal('b')]);

        assert_eq!(problem, Problem {
            grammar,
            words: vec!["ab".to_string(), "ba".to_string()]
        });
    }

    #[test]
    fn start_symbol_is_first_rule() {
        let problem = parse_str("2\n0\nA->a\nS->A\n").unwrap();
        assert_eq!(problem.grammar.start_symbol, 'A');

        let problem = parse_str("0\n0\n").unwrap();
        assert_eq!(problem.grammar.start_symbol, DEFAULT_START);
    }

    #[test]
    fn start_symbol_is_not_fixed_to_s() {
        let problem = parse_str("2\n1\nA->b\nS->a\na\n").unwrap();
        assert_eq!(problem.grammar.start_symbol, 'A');
        assert_eq!(problem.words, vec!["a".to_string()]);
    }

    #[test]
    fn blank_word_is_the_empty_word() {
        let problem = parse_str("1\n2\nS->e\n\n  a \n").unwrap();
        assert_eq!(problem.words, vec!["".to_string(), "a".to_string()]);
        assert!(problem.grammar.is_nullable('S'));
    }

    #[test]
    fn parse_malformed_counts() {
        assert_eq!(parse_str("").unwrap_err(), vec![CompileError {
            location: Location::new(),
            error: CompileErrorType::MissingCount("rule")
        }]);
        assert_eq!(parse_str("1\nmany\n").unwrap_err(), vec![CompileError {
            location: Location { file: PathBuf::new(), line: 2 },
            error: CompileErrorType::InvalidCount("many".to_string())
        }]);
        assert_eq!(parse_str("2\n1\nS->a\n").unwrap_err(), vec![CompileError {
            location: Location::new(),
            error: CompileErrorType::MissingLines { what: "rule", expected: 2, found: 1 }
        }]);
    }

    #[test]
    fn parse_normal_file() {
        let example_path = PathBuf::from("example_data/ab.txt");
        let problem = parse_file(&example_path).unwrap();

        assert_eq!(problem.grammar.start_symbol, 'S');
        assert_eq!(problem.grammar.production_count(), 3);
        assert_eq!(problem.words, vec!["ab".to_string(), "ba".to_string()]);
    }

    #[test]
    fn parse_malformed_file() {
        let example_path = PathBuf::from("example_data/malformed.txt");
        let example_parsed = parse_file(&example_path).unwrap_err();

        assert_eq!(example_parsed, vec![
            CompileError {
                location: Location {
                    file: example_path.clone(),
                    line: 4
                },
                error: CompileErrorType::MissingArrow
            },
            CompileError {
                location: Location {
                    file: example_path.clone(),
                    line: 6
                },
                error: CompileErrorType::InvalidSymbol('1')
            },
            CompileError {
                location: Location {
                    file: example_path,
                    line: 7
                },
                error: CompileErrorType::MissingNonterminal
            }
        ]);
    }

    #[test]
    fn parse_missing_file() {
        let example_path = PathBuf::from("example_data/does_not_exist.txt");
        assert_eq!(parse_file(&example_path).unwrap_err(), vec![CompileError {
            location: Location::whole(example_path.clone()),
            error: CompileErrorType::FileError(std::io::Error::from(std::io::ErrorKind::NotFound))
        }]);
    }
}
