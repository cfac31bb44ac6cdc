//! Data model: currencies, money, exchange rates and the ledger holding the balances

pub use currency::Currency;
pub use ledger::Ledger;
pub use money::Money;
pub use rates::{ExchangeRates, RECIPROCAL_DECIMALS};

mod currency;
mod ledger;
mod money;
mod rates;
