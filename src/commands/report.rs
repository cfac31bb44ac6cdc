use std::io;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, warn};

use crate::models::Ledger;

/// Writes one line per balance, converted to the reference currency when possible
pub fn print_balances<W: Write>(ledger: &Ledger, out: &mut W) -> io::Result<()> {
    for balance in ledger.snapshot() {
        writeln!(out, "{}", ledger.display(&balance))?;
    }
    out.flush()
}

/// Prints the balances to the standard output every `interval`, until the process ends
pub fn spawn_reporter(ledger: Arc<Ledger>, interval: Duration) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("reporter".to_string())
        .spawn(move || loop {
            thread::sleep(interval);
            debug!("Balance report triggered");
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if let Err(e) = print_balances(&ledger, &mut handle) {
                warn!("Could not print the balances: {}", e);
            }
        })
}
