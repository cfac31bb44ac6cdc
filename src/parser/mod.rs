//! Parser module
//!
//! Payment lines and exchange rate lines are split into fields by the models, every field is
//! then checked against the grammar:
//! - Currency codes, three upper case letters
//! - Decimal numbers, with an optional sign and an optional fractional part

mod utils;

pub use utils::{decode_line, parse_currency_code, parse_decimal, split_fields};

#[derive(Parser)]
#[grammar = "grammar/grammar.pest"]
pub struct GrammarParser;
