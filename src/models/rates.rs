use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use num::rational::BigRational;
use num::{BigInt, Signed};

use crate::models::Currency;
use crate::LedgerError;

/// Decimal places kept for the reciprocal of a registered rate
pub const RECIPROCAL_DECIMALS: usize = 5;

/// Exchange rates between pairs of currencies
///
/// Rates are always registered both ways. The rate given by the user is kept as is, the
/// reciprocal is rounded half up to [`RECIPROCAL_DECIMALS`] places.
///
/// # Examples
/// ```rust
/// # use paytrack::models::{Currency, ExchangeRates};
/// # use num::{BigInt, BigRational};
/// let usd = Currency::usd();
/// let gbp = "GBP".parse::<Currency>().unwrap();
/// let rates = ExchangeRates::new();
/// let rate = BigRational::new(BigInt::from(1012), BigInt::from(100));
/// rates.set(&usd, &gbp, rate.clone()).unwrap();
///
/// assert_eq!(rates.get(&usd, &gbp), Some(rate));
/// // 1 / 10.12 = 0.0988142...
/// assert_eq!(
///     rates.get(&gbp, &usd),
///     Some(BigRational::new(BigInt::from(9881), BigInt::from(100000)))
/// );
/// ```
#[derive(Debug, Default)]
pub struct ExchangeRates {
    rates: RwLock<HashMap<Currency, HashMap<Currency, BigRational>>>,
}

impl ExchangeRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `from -> to` and its reciprocal, replacing whatever was there
    pub fn set(
        &self,
        from: &Currency,
        to: &Currency,
        rate: BigRational,
    ) -> Result<(), LedgerError> {
        if !rate.is_positive() {
            return Err(LedgerError::NonPositiveRate {
                from: from.clone(),
                to: to.clone(),
                rate: rate.to_string(),
            });
        }
        let reciprocal = round_half_up(&rate.recip(), RECIPROCAL_DECIMALS);

        let mut rates = self.rates.write().unwrap_or_else(PoisonError::into_inner);
        rates
            .entry(from.clone())
            .or_insert_with(HashMap::new)
            .insert(to.clone(), rate);
        rates
            .entry(to.clone())
            .or_insert_with(HashMap::new)
            .insert(from.clone(), reciprocal);
        Ok(())
    }

    pub fn get(&self, from: &Currency, to: &Currency) -> Option<BigRational> {
        let rates = self.rates.read().unwrap_or_else(PoisonError::into_inner);
        rates.get(from).and_then(|targets| targets.get(to)).cloned()
    }

    /// Number of directed pairs with a known rate
    pub fn len(&self) -> usize {
        let rates = self.rates.read().unwrap_or_else(PoisonError::into_inner);
        rates.values().map(|targets| targets.len()).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rounds to `decimals` places, half-way cases away from zero
pub(crate) fn round_half_up(value: &BigRational, decimals: usize) -> BigRational {
    let scale = BigRational::from_integer(num::pow(BigInt::from(10), decimals));
    (value.clone() * scale.clone()).round() / scale
}
