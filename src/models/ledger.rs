use std::collections::HashMap;
use std::io;
use std::io::BufRead;
use std::sync::{PoisonError, RwLock};

use log::{info, warn};
use num::rational::BigRational;

use crate::models::{Currency, ExchangeRates, Money};
use crate::parser::{decode_line, parse_decimal, split_fields};
use crate::{LedgerError, ParserError};

/// Running balances per currency, in the order currencies were first seen
#[derive(Debug, Default)]
struct Balances {
    order: Vec<Currency>,
    by_currency: HashMap<Currency, Money>,
}

/// The ledger keeps a balance for every currency ever paid in and the exchange rates to
/// display those balances in a reference currency.
///
/// A single thread is expected to register payments while any number of threads read. Balances
/// are replaced, never mutated, so a reader sees either the old or the new value.
///
/// # Examples
/// ```rust
/// # use paytrack::models::Ledger;
/// let ledger = Ledger::new();
/// ledger.load_rates_line("USD, CZK, 25").unwrap();
/// ledger.load_payments_line("CZK 20").unwrap();
/// ledger.load_payments_line("CZK 2").unwrap();
///
/// let balances = ledger.snapshot();
/// assert_eq!(balances.len(), 1);
/// assert_eq!(ledger.display(&balances[0]), "CZK 22 (USD 0.88)");
/// ```
#[derive(Debug)]
pub struct Ledger {
    balances: RwLock<Balances>,
    rates: ExchangeRates,
    reference: Currency,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// An empty ledger that displays balances in USD
    pub fn new() -> Self {
        Self::with_reference(Currency::usd())
    }
    pub fn with_reference(reference: Currency) -> Self {
        Ledger {
            balances: RwLock::new(Balances::default()),
            rates: ExchangeRates::new(),
            reference,
        }
    }
    pub fn reference(&self) -> &Currency {
        &self.reference
    }
    pub fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    /// Adds a payment to the balance of its currency
    pub fn accumulate(&self, payment: Money) -> Result<(), LedgerError> {
        let mut guard = self.balances.write().unwrap_or_else(PoisonError::into_inner);
        let balances = &mut *guard;
        let updated = match balances.by_currency.get(payment.get_currency()) {
            None => {
                balances.order.push(payment.get_currency().clone());
                payment
            }
            Some(stored) => stored.try_add(&payment)?,
        };
        balances
            .by_currency
            .insert(updated.get_currency().clone(), updated);
        Ok(())
    }

    /// Registers the rate `from -> to` and the rounded reciprocal `to -> from`
    pub fn set_rate(
        &self,
        from: &Currency,
        to: &Currency,
        rate: BigRational,
    ) -> Result<(), LedgerError> {
        self.rates.set(from, to, rate)
    }

    pub fn rate(&self, from: &Currency, to: &Currency) -> Option<BigRational> {
        self.rates.get(from, to)
    }

    /// Reads a `<CODE>, <CODE>, <DECIMAL>` line and registers the rate
    pub fn load_rates_line(&self, line: &str) -> Result<(), LedgerError> {
        let fields: Vec<&str> = split_fields(line, ',')
            .into_iter()
            .map(str::trim)
            .collect();
        if fields.len() != 3 {
            return Err(ParserError::WrongFieldCount {
                expected: 3,
                found: fields.len(),
                line: line.to_string(),
            }
            .into());
        }
        let from: Currency = fields[0].parse()?;
        let to: Currency = fields[1].parse()?;
        let rate = parse_decimal(fields[2])?;
        self.set_rate(&from, &to, rate)
    }

    /// Reads a `<CODE> <DECIMAL>` line and adds it to the balances
    pub fn load_payments_line(&self, line: &str) -> Result<(), LedgerError> {
        let payment: Money = line.parse()?;
        self.accumulate(payment)
    }

    /// Loads every payment line of the reader, lines that can't be read are skipped
    ///
    /// Returns the number of payments registered.
    pub fn load_payments<R: BufRead>(&self, reader: R) -> io::Result<usize> {
        let mut loaded = 0;
        for raw in reader.split(b'\n') {
            let raw = raw?;
            let registered = decode_line(&raw)
                .map_err(LedgerError::from)
                .and_then(|line| self.load_payments_line(line));
            match registered {
                Ok(()) => loaded += 1,
                Err(e) => info!(
                    "Line [{}] had bad format: {}",
                    String::from_utf8_lossy(&raw),
                    e
                ),
            }
        }
        Ok(loaded)
    }

    /// Loads every exchange rate line of the reader, lines that can't be read are skipped
    ///
    /// Returns the number of rates registered.
    pub fn load_rates<R: BufRead>(&self, reader: R) -> io::Result<usize> {
        let mut loaded = 0;
        for raw in reader.split(b'\n') {
            let raw = raw?;
            let registered = decode_line(&raw)
                .map_err(LedgerError::from)
                .and_then(|line| self.load_rates_line(line));
            match registered {
                Ok(()) => loaded += 1,
                Err(e) => warn!(
                    "Error parsing exchange rate [{}]: {}",
                    String::from_utf8_lossy(&raw),
                    e
                ),
            }
        }
        Ok(loaded)
    }

    /// Converts the money to another currency
    ///
    /// Returns `None` if no rate is known for the pair.
    pub fn convert(&self, money: &Money, target: &Currency) -> Option<Money> {
        if money.get_currency() == target {
            return Some(money.clone());
        }
        let rate = self.rates.get(money.get_currency(), target)?;
        Some(Money::from((
            target.clone(),
            rate * money.get_amount().clone(),
        )))
    }

    /// The money followed by its value in the reference currency, when there is a rate for it
    pub fn format_with_reference(&self, money: &Money, reference: &Currency) -> String {
        if money.get_currency() == reference {
            return format!("{}", money);
        }
        match self.convert(money, reference) {
            None => format!("{}", money),
            Some(converted) => format!("{} ({})", money, converted),
        }
    }

    /// Same as [`Ledger::format_with_reference`] with the ledger's reference currency
    pub fn display(&self, money: &Money) -> String {
        self.format_with_reference(money, &self.reference)
    }

    /// A copy of all the balances, in the order their currencies were first seen
    pub fn snapshot(&self) -> Vec<Money> {
        let balances = self.balances.read().unwrap_or_else(PoisonError::into_inner);
        balances
            .order
            .iter()
            .filter_map(|currency| balances.by_currency.get(currency).cloned())
            .collect()
    }

    pub fn balance(&self, currency: &Currency) -> Option<Money> {
        let balances = self.balances.read().unwrap_or_else(PoisonError::into_inner);
        balances.by_currency.get(currency).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::BigInt;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::thread;

    fn rational(numer: i64, denom: i64) -> BigRational {
        BigRational::new(BigInt::from(numer), BigInt::from(denom))
    }

    fn currency(code: &str) -> Currency {
        code.parse().unwrap()
    }

    fn money(numer: i64, denom: i64, code: &str) -> Money {
        Money::new(rational(numer, denom), currency(code))
    }

    fn exchange_ledger() -> Ledger {
        let ledger = Ledger::new();
        ledger.load_rates_line("USD, GBP, 10.12").unwrap();
        ledger.load_rates_line("USD, CZK, 25").unwrap();
        ledger
    }

    #[test]
    fn exchange_reverse_czk_usd() {
        let ledger = exchange_ledger();
        let czk22 = money(22, 1, "CZK");
        let converted = ledger.convert(&czk22, &currency("USD")).unwrap();
        assert_eq!(converted, money(88, 100, "USD"));
        assert_eq!(ledger.display(&czk22), "CZK 22 (USD 0.88)");
    }

    #[test]
    fn exchange() {
        let ledger = exchange_ledger();
        let exchanged = ledger
            .convert(&money(20, 1, "USD"), &currency("CZK"))
            .unwrap();
        assert_eq!(exchanged, money(500, 1, "CZK"));
    }

    #[test]
    fn both_ways_exchange() {
        let ledger = exchange_ledger();
        let exchanged = ledger
            .convert(&money(1, 1, "GBP"), &currency("USD"))
            .unwrap();
        assert_eq!(exchanged, money(9881, 100000, "USD"));
    }

    #[test]
    fn exchange_string_formatting() {
        let ledger = exchange_ledger();
        assert_eq!(
            ledger.display(&money(15125, 100, "CZK")),
            "CZK 151.25 (USD 6.05)"
        );
        assert_eq!(ledger.display(&money(20, 1, "USD")), "USD 20");
        assert_eq!(ledger.display(&money(10, 1, "EUR")), "EUR 10");
        assert_eq!(
            ledger.format_with_reference(&money(1, 1, "USD"), &currency("GBP")),
            "USD 1 (GBP 10.12)"
        );
    }

    #[test]
    fn exchange_rate_saved_as_given() {
        let ledger = exchange_ledger();
        let exchanged = ledger
            .convert(&money(1, 1, "USD"), &currency("GBP"))
            .unwrap();
        assert_eq!(exchanged, money(1012, 100, "GBP"));
        assert_eq!(
            ledger.rate(&currency("GBP"), &currency("USD")),
            Some(rational(9881, 100000))
        );
    }

    #[test]
    fn same_currency_exchange() {
        let ledger = Ledger::new();
        let czk = money(15125, 100, "CZK");
        assert_eq!(ledger.convert(&czk, &currency("CZK")), Some(czk));
    }

    #[test]
    fn no_rate_available() {
        let ledger = exchange_ledger();
        assert_eq!(ledger.convert(&money(1, 1, "EUR"), &currency("USD")), None);
        // Rates are not chained: CZK -> USD -> GBP is not attempted
        assert_eq!(ledger.convert(&money(1, 1, "CZK"), &currency("GBP")), None);
    }

    #[test]
    fn register_payment() {
        let ledger = Ledger::new();
        assert!(ledger.snapshot().is_empty());

        ledger.load_payments_line("USD -20.2").unwrap();
        let amounts = ledger.snapshot();
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts[0], money(-202, 10, "USD"));

        ledger.load_payments_line("USD +1.2").unwrap();
        assert_eq!(ledger.snapshot()[0], money(-190, 10, "USD"));
    }

    #[test]
    fn snapshot_keeps_insertion_order() {
        let ledger = Ledger::new();
        for line in &["GBP 1", "USD 2", "CZK 3", "USD 4", "EUR 5"] {
            ledger.load_payments_line(line).unwrap();
        }
        let codes: Vec<String> = ledger
            .snapshot()
            .iter()
            .map(|m| m.get_currency().to_string())
            .collect();
        assert_eq!(codes, vec!["GBP", "USD", "CZK", "EUR"]);
        assert_eq!(ledger.snapshot(), ledger.snapshot());
        assert_eq!(ledger.balance(&currency("USD")), Some(money(6, 1, "USD")));
    }

    #[test]
    fn bad_payment_lines_leave_balances_alone() {
        let ledger = Ledger::new();
        ledger.load_payments_line("USD 10").unwrap();
        for line in &["", "USD 10 20", "USD", "XYZ 1", "USD 1.2.3"] {
            assert!(matches!(
                ledger.load_payments_line(line),
                Err(LedgerError::Parser(_))
            ));
        }
        assert_eq!(ledger.snapshot(), vec![money(10, 1, "USD")]);
    }

    #[test]
    fn bad_rate_lines() {
        let ledger = Ledger::new();
        assert_eq!(
            ledger.load_rates_line("USD, GBP"),
            Err(LedgerError::Parser(ParserError::WrongFieldCount {
                expected: 3,
                found: 2,
                line: "USD, GBP".to_string()
            }))
        );
        assert!(ledger.load_rates_line("USD, GBP, 1, 2").is_err());
        assert!(ledger.load_rates_line("USD, XYZ, 1").is_err());
        assert!(ledger.load_rates_line("USD, GBP, abc").is_err());
        assert!(matches!(
            ledger.load_rates_line("USD, GBP, 0"),
            Err(LedgerError::NonPositiveRate { .. })
        ));
        assert!(matches!(
            ledger.load_rates_line("USD, GBP, -2"),
            Err(LedgerError::NonPositiveRate { .. })
        ));
        assert!(ledger.rates().is_empty());
    }

    #[test]
    fn rate_fields_are_trimmed() {
        let ledger = Ledger::new();
        ledger.load_rates_line("  EUR ,USD,   1.1  ").unwrap();
        assert_eq!(
            ledger.rate(&currency("EUR"), &currency("USD")),
            Some(rational(11, 10))
        );
    }

    #[test]
    fn trailing_rate_separator() {
        let ledger = Ledger::new();
        ledger.load_rates_line("USD, GBP, 1,").unwrap();
        assert_eq!(
            ledger.rate(&currency("USD"), &currency("GBP")),
            Some(rational(1, 1))
        );
        // A separator followed by blanks is still a fourth field
        assert!(ledger.load_rates_line("USD, GBP, 1, ").is_err());
    }

    #[test]
    fn bulk_loading_skips_undecodable_lines() {
        let ledger = Ledger::new();
        let payments = Cursor::new(&b"USD 10\nEUR \xe9\nCZK 5\r\n"[..]);
        assert_eq!(ledger.load_payments(payments).unwrap(), 2);
        assert_eq!(
            ledger.snapshot(),
            vec![money(10, 1, "USD"), money(5, 1, "CZK")]
        );

        let rates = Cursor::new(&b"USD, \xff\xfe, 2\nUSD, CZK, 25\n"[..]);
        assert_eq!(ledger.load_rates(rates).unwrap(), 1);
        assert_eq!(ledger.display(&money(5, 1, "CZK")), "CZK 5 (USD 0.2)");
    }

    #[test]
    fn bulk_loading_skips_bad_lines() {
        let ledger = Ledger::new();
        let payments = "USD 1000\nHKD 100\nwrong line\n\nUSD -100\nRMB 2000\nGBP 5.5\n";
        assert_eq!(ledger.load_payments(Cursor::new(payments)).unwrap(), 4);
        assert_eq!(ledger.balance(&currency("USD")), Some(money(900, 1, "USD")));
        assert_eq!(ledger.snapshot().len(), 3);

        let rates = "USD, HKD, 7.8\nnot a rate\nGBP, USD, 1.3\nUSD, GBP, 0\n";
        assert_eq!(ledger.load_rates(Cursor::new(rates)).unwrap(), 2);
        assert_eq!(ledger.display(&money(78, 1, "HKD")), "HKD 78 (USD 10)");
        assert_eq!(ledger.display(&money(2, 1, "GBP")), "GBP 2 (USD 2.6)");
    }

    #[test]
    fn reference_currency() {
        let ledger = Ledger::with_reference(currency("EUR"));
        ledger.load_rates_line("EUR, CZK, 25").unwrap();
        ledger.load_payments_line("CZK 100").unwrap();
        assert_eq!(ledger.reference(), &currency("EUR"));
        assert_eq!(ledger.display(&ledger.snapshot()[0]), "CZK 100 (EUR 4)");
    }

    #[test]
    fn concurrent_reader() {
        let ledger = Arc::new(Ledger::new());
        let reader = {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                for _ in 0..1000 {
                    for balance in ledger.snapshot() {
                        assert_eq!(balance.get_currency(), &Currency::usd());
                    }
                }
            })
        };
        for _ in 0..1000 {
            ledger.load_payments_line("USD 1").unwrap();
        }
        reader.join().unwrap();
        assert_eq!(ledger.snapshot(), vec![money(1000, 1, "USD")]);
    }
}
