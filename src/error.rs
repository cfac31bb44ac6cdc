use colored::{ColoredString, Colorize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Currency;

/// Problems found while reading a payment or an exchange rate line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    #[error("the line is empty")]
    EmptyLine,
    #[error("expected {expected} fields but found {found} in {line:?}")]
    WrongFieldCount {
        expected: usize,
        found: usize,
        line: String,
    },
    #[error("unknown currency code {0:?}")]
    UnknownCurrency(String),
    #[error("invalid decimal number {0:?}")]
    InvalidDecimal(String),
    #[error("the line is not valid UTF-8: {0:?}")]
    InvalidEncoding(String),
}

/// Operations the ledger refuses to perform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("can't add {found} to an amount in {expected}")]
    CurrencyMismatch { expected: Currency, found: Currency },
    #[error("the exchange rate {from} -> {to} must be positive, got {rate}")]
    NonPositiveRate {
        from: Currency,
        to: Currency,
        rate: String,
    },
    #[error(transparent)]
    Parser(#[from] ParserError),
}

#[derive(Debug)]
pub enum MissingFileError {
    ConfigFileDoesNotExistError(PathBuf),
    PaymentsFileDoesNotExistError(PathBuf),
    RatesFileDoesNotExistError(PathBuf),
}
impl std::error::Error for MissingFileError {}
impl Display for MissingFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (title, file) = match self {
            MissingFileError::ConfigFileDoesNotExistError(x) => ("Configuration", x),
            MissingFileError::PaymentsFileDoesNotExistError(x) => ("Payments", x),
            MissingFileError::RatesFileDoesNotExistError(x) => ("Exchange rates", x),
        };
        write!(
            f,
            "{} file does not exist: {}",
            title,
            file.display().to_string().red().bold()
        )
    }
}

/// Error reported to the user by the command line application
#[derive(Debug)]
pub struct Error {
    pub message: Vec<ColoredString>,
}

impl Error {
    pub fn new(message: &str) -> Self {
        Error {
            message: vec![message.bold().bright_red()],
        }
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ColoredStrings(&self.message))
    }
}

impl From<MissingFileError> for Error {
    fn from(error: MissingFileError) -> Self {
        Error {
            message: vec![format!("{}", error).normal()],
        }
    }
}

impl From<LedgerError> for Error {
    fn from(error: LedgerError) -> Self {
        Error::new(&error.to_string())
    }
}

impl From<ParserError> for Error {
    fn from(error: ParserError) -> Self {
        Error::new(&error.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error {
            message: vec!["I/O error: ".bold(), error.to_string().bright_red()],
        }
    }
}

impl From<structopt::clap::Error> for Error {
    fn from(error: structopt::clap::Error) -> Self {
        Error {
            message: vec![error.message.normal()],
        }
    }
}

// https://medium.com/apolitical-engineering/how-do-you-impl-display-for-vec-b8dbb21d814f
struct ColoredStrings<'a>(pub &'a Vec<ColoredString>);

impl<'a> fmt::Display for ColoredStrings<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.iter().fold(Ok(()), |result, partial| {
            result.and_then(|_| write!(f, "{}", partial))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_names_the_path() {
        colored::control::set_override(false);
        let error = MissingFileError::RatesFileDoesNotExistError(PathBuf::from("rates.txt"));
        assert_eq!(
            format!("{}", error),
            "Exchange rates file does not exist: rates.txt"
        );
        let error: Error = error.into();
        assert!(format!("{}", error).contains("rates.txt"));
    }

    #[test]
    fn parser_errors_convert_into_ledger_errors() {
        let error: LedgerError = ParserError::UnknownCurrency("XYZ".to_string()).into();
        assert_eq!(format!("{}", error), "unknown currency code \"XYZ\"");
    }
}
