// ABOUTME: Lexical analyzer turning a character stream into tokens

use crate::error::LexError;
use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, multispace1},
    combinator::value,
    multi::many0,
    sequence::preceded,
    IResult, Parser,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Open,
    Close,
    Quote,
    Dot,
    Int(i64),
    Double(f64),
    Str(String),
    Symbol(String),
    Bool(bool),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open => write!(f, "(:open"),
            Token::Close => write!(f, "):close"),
            Token::Quote => write!(f, "':quote"),
            Token::Dot => write!(f, ".:dot"),
            Token::Int(i) => write!(f, "{}:integer", i),
            Token::Double(d) => write!(f, "{:.6}:double", d),
            Token::Str(s) => write!(f, "\"{}\":string", s),
            Token::Symbol(s) => write!(f, "{}:symbol", s),
            Token::Bool(b) => write!(f, "{}:boolean", if *b { "#t" } else { "#f" }),
        }
    }
}

/// Whitespace and line comments between tokens.
fn trivia(input: &str) -> IResult<&str, ()> {
    many0(alt((
        value((), multispace1),
        value((), preceded(char(';'), take_while(|c| c != '\n'))),
    )))
    .map(|_| ())
    .parse(input)
}

fn skip_trivia(input: &str) -> &str {
    match trivia(input) {
        Ok((rest, ())) => rest,
        Err(_) => input,
    }
}

/// Initial symbol characters; digits, `.`, `+`, `-` are allowed after.
fn is_initial(c: char) -> bool {
    c.is_ascii_alphabetic() || "!$%&*/:<=>?~_^".contains(c)
}

fn is_subsequent(c: char) -> bool {
    is_initial(c) || c.is_ascii_digit() || matches!(c, '.' | '+' | '-')
}

/// Characters that end a symbol or number.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or('\0')
}

/// Build a lex error pointing at the start of `tail` (a suffix of `input`).
fn err_at(input: &str, tail: &str, reason: &'static str) -> LexError {
    LexError {
        character: first_char(tail),
        position: input[..input.len() - tail.len()].chars().count() + 1,
        reason,
    }
}

/// Tokenize the whole input, or fail with the first untokenizable character.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        rest = skip_trivia(rest);
        let Some(c) = rest.chars().next() else {
            return Ok(tokens);
        };
        let (next, token) = match c {
            '(' => (&rest[1..], Token::Open),
            ')' => (&rest[1..], Token::Close),
            '\'' => (&rest[1..], Token::Quote),
            '"' => lex_string(input, rest)?,
            '#' => lex_bool(input, rest)?,
            '+' | '-' => lex_sign(input, rest)?,
            '.' => lex_dot(input, rest)?,
            c if c.is_ascii_digit() => lex_number(input, rest)?,
            c if is_initial(c) => lex_symbol(input, rest)?,
            _ => return Err(err_at(input, rest, "Input not recognized")),
        };
        tokens.push(token);
        rest = next;
    }
}

/// A lone `+` or `-` before a delimiter is the symbol; otherwise it signs a
/// number.
fn lex_sign<'a>(input: &str, rest: &'a str) -> Result<(&'a str, Token), LexError> {
    match rest[1..].chars().next() {
        None => Ok(("", Token::Symbol(rest[..1].to_string()))),
        Some(c) if is_delimiter(c) => Ok((&rest[1..], Token::Symbol(rest[..1].to_string()))),
        Some(_) => lex_number(input, rest),
    }
}

/// A lone `.` before a delimiter is the improper-tail marker; otherwise it
/// starts a double with an implicit leading zero.
fn lex_dot<'a>(input: &str, rest: &'a str) -> Result<(&'a str, Token), LexError> {
    match rest[1..].chars().next() {
        None => Ok(("", Token::Dot)),
        Some(c) if is_delimiter(c) => Ok((&rest[1..], Token::Dot)),
        Some(_) => lex_number(input, rest),
    }
}

fn lex_number<'a>(input: &str, rest: &'a str) -> Result<(&'a str, Token), LexError> {
    let mut i = 0;
    if matches!(rest.as_bytes().first(), Some(b'+') | Some(b'-')) {
        i = 1;
    }
    let mut seen_dot = false;
    loop {
        let tail = &rest[i..];
        let Some(c) = tail.chars().next() else { break };
        if c.is_ascii_digit() {
            i += 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            i += 1;
        } else if is_delimiter(c) {
            break;
        } else {
            return Err(err_at(input, tail, "Invalid number"));
        }
    }
    let text = &rest[..i];
    if text.ends_with('.') {
        return Err(err_at(input, &rest[i - 1..], "Invalid number"));
    }
    let token = if seen_dot {
        Token::Double(
            text.parse()
                .map_err(|_| err_at(input, rest, "Invalid number"))?,
        )
    } else {
        Token::Int(
            text.parse()
                .map_err(|_| err_at(input, rest, "Invalid number"))?,
        )
    };
    Ok((&rest[i..], token))
}

fn lex_symbol<'a>(input: &str, rest: &'a str) -> Result<(&'a str, Token), LexError> {
    let mut i = 1; // initial character validated by the caller
    loop {
        let tail = &rest[i..];
        match tail.chars().next() {
            None => break,
            Some(c) if is_subsequent(c) => i += c.len_utf8(),
            Some(c) if is_delimiter(c) => break,
            Some(_) => return Err(err_at(input, tail, "Invalid symbol")),
        }
    }
    Ok((&rest[i..], Token::Symbol(rest[..i].to_string())))
}

fn lex_string<'a>(input: &str, rest: &'a str) -> Result<(&'a str, Token), LexError> {
    let mut out = String::new();
    let mut iter = rest.char_indices();
    iter.next(); // opening quote
    while let Some((i, c)) = iter.next() {
        match c {
            '"' => return Ok((&rest[i + 1..], Token::Str(out))),
            '\\' => match iter.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\'')) => out.push('\''),
                Some((j, _)) => {
                    return Err(err_at(input, &rest[j..], "Invalid escaped character"));
                }
                None => break,
            },
            _ => out.push(c),
        }
    }
    Err(err_at(input, rest, "Unterminated string"))
}

fn lex_bool<'a>(input: &str, rest: &'a str) -> Result<(&'a str, Token), LexError> {
    match rest[1..].chars().next() {
        Some('t') => Ok((&rest[2..], Token::Bool(true))),
        Some('f') => Ok((&rest[2..], Token::Bool(false))),
        _ => Err(err_at(input, rest, "Incorrect Boolean")),
    }
}
