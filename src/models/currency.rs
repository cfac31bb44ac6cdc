use std::collections::HashSet;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use lazy_static::lazy_static;

use crate::parser::parse_currency_code;
use crate::ParserError;

/// Currency representation
///
/// A currency is identified by its ISO 4217 alphabetic code. Only codes that are (or have been)
/// part of the standard are accepted, so typos are caught when reading payments.
///
/// # Examples
/// ```rust
/// use paytrack::models::Currency;
///
/// let usd1: Currency = "USD".parse().unwrap();
/// let usd2 = Currency::usd();
/// assert_eq!(usd1, usd2);
///
/// // Historic currencies are still known
/// assert!("ESP".parse::<Currency>().is_ok());
///
/// // But made up ones are not
/// assert!("ABC".parse::<Currency>().is_err());
/// assert!("usd".parse::<Currency>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Currency {
    code: String,
}

impl Currency {
    pub fn usd() -> Self {
        Currency {
            code: "USD".to_string(),
        }
    }
    pub fn get_code(&self) -> &str {
        self.code.as_str()
    }
}

impl FromStr for Currency {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = parse_currency_code(s)?;
        if !ISO_4217.contains(code) {
            return Err(ParserError::UnknownCurrency(s.to_string()));
        }
        Ok(Currency {
            code: code.to_string(),
        })
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

lazy_static! {
    static ref ISO_4217: HashSet<&'static str> = ISO_4217_CODES.iter().copied().collect();
}

// Active codes followed by the withdrawn ones that still show up in old records
const ISO_4217_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BOV", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD",
    "CAD", "CDF", "CHE", "CHF", "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUC", "CUP",
    "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP",
    "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HRK", "HTG", "HUF", "IDR",
    "ILS", "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW",
    "KRW", "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA",
    "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MXV", "MYR", "MZN", "NAD",
    "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG",
    "QAR", "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE",
    "SLL", "SOS", "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP",
    "TRY", "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "USN", "UYI", "UYU", "UYW", "UZS", "VED",
    "VES", "VND", "VUV", "WST", "XAF", "XAG", "XAU", "XBA", "XBB", "XBC", "XBD", "XCD", "XDR",
    "XOF", "XPD", "XPF", "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR", "ZMW", "ZWL",
    // withdrawn
    "ADP", "AFA", "ATS", "AYM", "AZM", "BEF", "BGL", "BYB", "BYR", "CSD", "CYP", "DEM", "EEK",
    "ESP", "FIM", "FRF", "GHC", "GRD", "GWP", "IEP", "ITL", "LTL", "LUF", "LVL", "MGF", "MRO",
    "MTL", "MZM", "NLG", "PTE", "ROL", "RUR", "SDD", "SIT", "SKK", "SRG", "STD", "TMM", "TPE",
    "TRL", "USS", "VEB", "VEF", "XFO", "XFU", "YUM", "ZMK", "ZWD", "ZWN", "ZWR",
];
