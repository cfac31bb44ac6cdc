use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use num::rational::BigRational;
use num::{BigInt, Integer, Signed, Zero};

use crate::models::Currency;
use crate::parser::{parse_decimal, split_fields};
use crate::{LedgerError, ParserError};

/// Money representation: an amount and a currency
///
/// It is important that calculations are not done with floats but with Rational numbers so that
/// everything adds up correctly
///
/// Money of the same currency can be added, the result is a new value
/// # Examples
/// ```rust
/// # use paytrack::models::Money;
/// let m1: Money = "USD -20.2".parse().unwrap();
/// let m2: Money = "USD +1.2".parse().unwrap();
/// let total = m1.try_add(&m2).unwrap();
/// assert_eq!(format!("{}", total), "USD -19");
///
/// // Different currencies can't be added
/// let c1: Money = "CZK 151.25".parse().unwrap();
/// assert!(total.try_add(&c1).is_err());
///
/// // Display rounds to two decimals and drops trailing zeros
/// assert_eq!(format!("{}", c1), "CZK 151.25");
/// let c2: Money = "CZK 0.125".parse().unwrap();
/// assert_eq!(format!("{}", c2), "CZK 0.13");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Money {
    amount: BigRational,
    currency: Currency,
}

impl Money {
    pub fn new(amount: BigRational, currency: Currency) -> Self {
        Money { amount, currency }
    }
    pub fn get_amount(&self) -> &BigRational {
        &self.amount
    }
    pub fn get_currency(&self) -> &Currency {
        &self.currency
    }

    /// Adds two amounts of the same currency
    pub fn try_add(&self, other: &Money) -> Result<Money, LedgerError> {
        if self.currency != other.currency {
            return Err(LedgerError::CurrencyMismatch {
                expected: self.currency.clone(),
                found: other.currency.clone(),
            });
        }
        Ok(Money::new(
            self.amount.clone() + other.amount.clone(),
            self.currency.clone(),
        ))
    }
}

impl From<(Currency, BigRational)> for Money {
    fn from(cur_amount: (Currency, BigRational)) -> Self {
        let (currency, amount) = cur_amount;
        Money { amount, currency }
    }
}

impl FromStr for Money {
    type Err = ParserError;

    /// Reads `<CODE> <DECIMAL>`, the two fields separated by exactly one space.
    /// Trailing spaces are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParserError::EmptyLine);
        }
        let fields = split_fields(s, ' ');
        if fields.len() != 2 {
            return Err(ParserError::WrongFieldCount {
                expected: 2,
                found: fields.len(),
                line: s.to_string(),
            });
        }
        let currency = Currency::from_str(fields[0])?;
        let amount = parse_decimal(fields[1])?;
        Ok(Money { amount, currency })
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Round half away from zero to two decimals, then split into integer and cents
        let hundred = BigInt::from(100);
        let cents = (self.amount.clone() * BigRational::from_integer(hundred.clone()))
            .round()
            .to_integer();
        let sign = if cents.is_negative() { "-" } else { "" };
        let (integer_part, decimal_part) = cents.abs().div_rem(&hundred);

        let mut decimal_str = if decimal_part.is_zero() {
            String::new()
        } else {
            format!(".{:0>2}", decimal_part.to_string())
        };
        if decimal_str.ends_with('0') {
            decimal_str.pop();
        }
        write!(
            f,
            "{} {}{}{}",
            self.currency, sign, integer_part, decimal_str
        )
    }
}
