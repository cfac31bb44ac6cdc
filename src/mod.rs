extern crate pest;
#[macro_use]
extern crate pest_derive;

mod app;
pub mod commands;
mod error;
pub mod models;
pub mod parser;

pub use app::{run_app, Opt};
pub use error::{Error, LedgerError, MissingFileError, ParserError};
