//! Document the command line interface
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use std::collections::HashMap;
use std::fs::{read_to_string, File};
use std::io;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use structopt::clap::ErrorKind;
use structopt::StructOpt;

use crate::commands::{report, track};
use crate::models::{Currency, Ledger};
use crate::{Error, MissingFileError};

/// Command line options
#[derive(Debug, StructOpt, Clone)]
#[structopt(
    about = "Tracks payments in several currencies, in memory",
    version = env!("CARGO_PKG_VERSION"),
    name = "paytrack"
)]
pub struct Opt {
    /// Loads payments from the file at startup, one "<CURRENCY_CODE> <DECIMAL>" per line
    #[structopt(name = "FILE", short = "f", long = "file", parse(from_os_str))]
    pub payments_file: Option<PathBuf>,

    /// Exchange rates file, one "<CODE>, <CODE>, <RATE>" per line
    #[structopt(short = "e", long = "exchange", parse(from_os_str))]
    pub rates_file: Option<PathBuf>,

    /// Seconds between two printouts of the balances
    #[structopt(short = "t", long = "timeout", default_value = "60")]
    pub timeout: u64,

    /// Currency the balances are converted to when displayed
    #[structopt(short = "r", long = "reference", default_value = "USD")]
    pub reference: Currency,

    /// Ignore init file if it exists
    #[structopt(long = "args-only")]
    args_only: bool,

    /// Init file
    #[structopt(long = "init-file", parse(from_os_str))]
    init_file: Option<PathBuf>,

    #[structopt(long = "force-color")]
    pub force_color: bool,
}

const PATHS_UNDER_DIR: &str = "~/.paytrackrc";
const LOCAL_PATHS: &str = ".paytrackrc";

impl Opt {
    /// The init file to read, if any
    fn init_file(&self) -> Result<Option<PathBuf>, Error> {
        if self.args_only {
            return Ok(None);
        }
        if let Some(path) = &self.init_file {
            return if path.exists() {
                Ok(Some(path.clone()))
            } else {
                Err(MissingFileError::ConfigFileDoesNotExistError(path.clone()).into())
            };
        }
        let possible_paths = vec![
            PathBuf::from(shellexpand::tilde(PATHS_UNDER_DIR).to_string()),
            PathBuf::from(LOCAL_PATHS),
        ];
        Ok(possible_paths.into_iter().find(|path| path.exists()))
    }
}

/// Parses the options, `None` when only help or version was asked for
fn parse_options(args: &[String]) -> Result<Option<Opt>, Error> {
    match Opt::from_iter_safe(args.iter()) {
        Ok(opt) => Ok(Some(opt)),
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => {
                println!("{}", e.message);
                Ok(None)
            }
            _ => Err(e.into()),
        },
    }
}

/// Adds the options of the init file that are not already in the argument vector
fn merge_init_file(args: &mut Vec<String>, contents: &str, file: &Path) -> Result<(), Error> {
    lazy_static! {
        static ref RE_OPTION: Regex = Regex::new(r"^(--[a-z][a-z-]*)(?:\s+(.*?))?\s*$").unwrap();
    }
    let mut aliases = HashMap::new();
    aliases.insert("-f", "--file");
    aliases.insert("-e", "--exchange");
    aliases.insert("-t", "--timeout");
    aliases.insert("-r", "--reference");

    for line in contents.lines() {
        let option = line.trim();
        match option.chars().next() {
            None | Some(';') | Some('#') | Some('!') | Some('%') => (), // a comment
            Some(_) => {
                let captures = match RE_OPTION.captures(option) {
                    Some(captures) => captures,
                    None => {
                        return Err(Error::new(&format!(
                            "Bad config file {:?}\n{}",
                            file, line
                        )))
                    }
                };
                let name = &captures[1];
                let given = args.iter().any(|x| {
                    x == name
                        || x.starts_with(&format!("{}=", name))
                        || aliases.get(x.as_str()).map_or(false, |long| *long == name)
                });
                if !given {
                    args.push(name.to_string());
                    if let Some(value) = captures.get(2) {
                        args.push(value.as_str().to_string());
                    }
                }
            }
        }
    }
    Ok(())
}

fn open(path: &Path, missing: fn(PathBuf) -> MissingFileError) -> Result<BufReader<File>, Error> {
    if !path.exists() {
        return Err(missing(path.to_path_buf()).into());
    }
    Ok(BufReader::new(File::open(path)?))
}

/// Entry point for the command line app
///
/// Load the options from the init file, add them to the supplied command line options, load the
/// payments and the exchange rates and track the payments typed by the user.
pub fn run_app(mut args: Vec<String>) -> Result<(), Error> {
    let mut opt = match parse_options(&args)? {
        Some(opt) => opt,
        None => return Ok(()),
    };
    if let Some(file) = opt.init_file()? {
        let contents = read_to_string(&file)?;
        merge_init_file(&mut args, &contents, &file)?;
        opt = match parse_options(&args)? {
            Some(opt) => opt,
            None => return Ok(()),
        };
    }
    if opt.force_color {
        colored::control::set_override(true);
    }
    if opt.timeout == 0 {
        return Err(Error::new("The timeout must be at least one second"));
    }

    let ledger = Arc::new(Ledger::with_reference(opt.reference.clone()));
    if let Some(path) = &opt.payments_file {
        let reader = open(path, MissingFileError::PaymentsFileDoesNotExistError)?;
        let loaded = ledger.load_payments(reader)?;
        info!("Loaded {} payments from {}", loaded, path.display());
    }
    if let Some(path) = &opt.rates_file {
        let reader = open(path, MissingFileError::RatesFileDoesNotExistError)?;
        let loaded = ledger.load_rates(reader)?;
        info!("Loaded {} exchange rates from {}", loaded, path.display());
    }

    // First report right away, then every `timeout` seconds
    {
        let stdout = io::stdout();
        report::print_balances(&ledger, &mut stdout.lock())?;
    }
    report::spawn_reporter(Arc::clone(&ledger), Duration::from_secs(opt.timeout))?;

    let stdin = io::stdin();
    let registered = track::read_payments(&ledger, stdin.lock(), &mut io::stderr())?;
    info!("{} payments registered", registered);
    Ok(())
}
