// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Number and command tokenizing using nom
//!
//! Shared by path data, `points` lists and transform lists. Numbers may be
//! run together without separators (`10-5.5.5` is `10`, `-5.5`, `.5`), which
//! is why tokens are recognized greedily rather than split on delimiters.

use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, one_of, satisfy},
    combinator::{map, map_opt, opt, recognize},
    sequence::tuple,
    IResult,
};

use crate::error::{Error, Result};

/// Path data token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Command letter: M, l, Z, ...
    Command(char),
    /// Numeric operand
    Number(f64),
}

/// Recognize a number literal: 12, -1.5, .5, 3e-2
///
/// A trailing `.` with no fraction digits is not part of the literal.
fn number_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((recognize(tuple((digit0, char('.'), digit1))), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

/// Parse a number literal into f64
///
/// Literals that overflow f64 (`1e400`) are rejected rather than read as infinity.
pub fn number(input: &str) -> IResult<&str, f64> {
    map_opt(number_literal, |s: &str| {
        fast_float::parse::<f64, _>(s.strip_prefix('+').unwrap_or(s))
            .ok()
            .filter(|v: &f64| v.is_finite())
    })(input)
}

/// Parse a single path token
fn token(input: &str) -> IResult<&str, Token> {
    alt((
        map(number, Token::Number),
        map(satisfy(|c| c.is_ascii_alphabetic()), Token::Command),
    ))(input)
}

/// Tokenize path data into command letters and numbers.
///
/// Whitespace, commas and any other unrecognized characters act as separators.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        match token(rest) {
            Ok((next, tok)) => {
                tokens.push(tok);
                rest = next;
            }
            Err(_) => {
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
        }
    }

    tokens
}

/// Extract every number literal from a list such as a `points` attribute
pub fn numbers(input: &str) -> Vec<f64> {
    tokenize(input)
        .into_iter()
        .filter_map(|t| match t {
            Token::Number(n) => Some(n),
            Token::Command(_) => None,
        })
        .collect()
}

/// Parse a complete scalar value such as `12.5` or ` -3 `.
///
/// Non-finite results are rejected so they cannot poison downstream geometry.
pub fn parse_number(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    match fast_float::parse::<f64, _>(unsigned) {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::invalid_number(text)),
    }
}
