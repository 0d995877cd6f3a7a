use itertools::PeekingNext;

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Arrow,
    Nonterminal(char),
    Terminal(char)
}

pub fn lex_arrow(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    line.next(); // Consume the dash
    if line.peeking_next(|&c| c == '>').is_none() {
        return Err(CompileErrorType::InvalidSymbol('-'));
    }

    Ok(Token::Arrow)
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(&c) = line_chars.peek() {
        if c == '-' {
            tokens.push(lex_arrow(&mut line_chars)?);
        } else if c.is_ascii_uppercase() {
            line_chars.next();
            tokens.push(Token::Nonterminal(c));
        } else if c.is_ascii_lowercase() {
            line_chars.next();
            tokens.push(Token::Terminal(c));
        } else if c.is_whitespace() {
            line_chars.next();
        } else {
            return Err(CompileErrorType::InvalidSymbol(c));
        }
    }

    return Ok(tokens);
}
