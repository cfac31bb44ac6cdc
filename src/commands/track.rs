use std::io;
use std::io::{BufRead, Write};

use colored::Colorize;
use log::info;

use crate::models::Ledger;
use crate::parser::decode_line;
use crate::LedgerError;

/// Typing this ends the program
pub const QUIT_COMMAND: &str = "quit";

pub const WRONG_FORMAT_MESSAGE: &str =
    "Wrong input format. Please enter (without quotes): \"<CURRENCY_CODE> <DECIMAL VALUE>\"";

/// Registers the payments typed by the user until `quit` or the end of the input
///
/// Lines that are not payments are reported on `errors` and the loop goes on.
/// Returns the number of payments registered.
pub fn read_payments<R: BufRead, W: Write>(
    ledger: &Ledger,
    input: R,
    errors: &mut W,
) -> io::Result<usize> {
    let mut registered = 0;
    for raw in input.split(b'\n') {
        let raw = raw?;
        let line = decode_line(&raw);
        if let Ok(text) = &line {
            if text.trim().eq_ignore_ascii_case(QUIT_COMMAND) {
                info!("Quit requested");
                break;
            }
        }
        match line
            .map_err(LedgerError::from)
            .and_then(|line| ledger.load_payments_line(line))
        {
            Ok(()) => registered += 1,
            Err(e) => {
                writeln!(errors, "{}", WRONG_FORMAT_MESSAGE.yellow())?;
                info!("Bad user input [{}]: {}", String::from_utf8_lossy(&raw), e);
            }
        }
    }
    Ok(registered)
}
