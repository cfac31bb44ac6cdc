//! This module contains auxiliary parsers

use super::{GrammarParser, Rule};
use crate::ParserError;
use num::{BigInt, BigRational};
use pest::iterators::Pair;

use pest::Parser;
use std::str::FromStr;

/// Parses a decimal number exactly, no floating point is involved
///
/// ```rust
/// # use paytrack::parser::parse_decimal;
/// # use num::{BigInt, BigRational};
/// let amount = parse_decimal("-20.2").unwrap();
/// assert_eq!(amount, BigRational::new(BigInt::from(-202), BigInt::from(10)));
/// assert!(parse_decimal("1e5").is_err());
/// ```
pub fn parse_decimal(field: &str) -> Result<BigRational, ParserError> {
    let invalid = || ParserError::InvalidDecimal(field.to_string());
    let decimal = GrammarParser::parse(Rule::decimal_field, field)
        .map_err(|_| invalid())?
        .next()
        .and_then(|parsed| parsed.into_inner().next())
        .ok_or_else(invalid)?;
    parse_rational(decimal).ok_or_else(invalid)
}

/// Checks that the field looks like a currency code and returns it
pub fn parse_currency_code(field: &str) -> Result<&str, ParserError> {
    match GrammarParser::parse(Rule::currency_field, field) {
        Ok(_) => Ok(field),
        Err(_) => Err(ParserError::UnknownCurrency(field.to_string())),
    }
}

/// Decodes one raw line as read by `BufRead::split(b'\n')`, a trailing `\r` is removed
pub fn decode_line(raw: &[u8]) -> Result<&str, ParserError> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw)
        .map_err(|_| ParserError::InvalidEncoding(String::from_utf8_lossy(raw).into_owned()))
}

/// Splits a line on `separator`, trailing empty fields are dropped
///
/// ```rust
/// # use paytrack::parser::split_fields;
/// assert_eq!(split_fields("USD 10 ", ' '), vec!["USD", "10"]);
/// assert_eq!(split_fields("USD  10", ' '), vec!["USD", "", "10"]);
/// ```
pub fn split_fields(line: &str, separator: char) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(separator).collect();
    while fields.last() == Some(&"") {
        fields.pop();
    }
    fields
}

fn parse_rational(number: Pair<Rule>) -> Option<BigRational> {
    let mut num = String::new();
    let mut den = "1".to_string();
    for part in number.into_inner() {
        match part.as_rule() {
            Rule::sign => {
                if part.as_str() == "-" {
                    num.push('-')
                }
            }
            Rule::integer => num.push_str(part.as_str()),
            Rule::fraction => {
                num.push_str(part.as_str());
                den.extend(part.as_str().chars().map(|_| '0'));
            }
            _ => (),
        }
    }
    Some(BigRational::new(
        BigInt::from_str(num.as_str()).ok()?,
        BigInt::from_str(den.as_str()).ok()?,
    ))
}
