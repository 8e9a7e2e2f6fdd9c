//! Currency codes and the currencies offered for display.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// An ISO 4217 style currency code, e.g. "USD".
///
/// Codes are exactly three ASCII letters and are stored in upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// The currency all amounts are persisted in.
    pub fn canonical() -> Self {
        Self(CANONICAL_CURRENCY.to_owned())
    }

    /// Whether this is the currency amounts are persisted in.
    pub fn is_canonical(&self) -> bool {
        self.0 == CANONICAL_CURRENCY
    }

    /// Create a code from a literal known to be valid.
    pub(crate) fn from_static(code: &'static str) -> Self {
        code.parse().unwrap_or_default()
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The symbol shown next to amounts in this currency, falling back to the
    /// code itself for currencies that are not offered in the selector.
    pub fn symbol(&self) -> &str {
        match DISPLAY_CURRENCIES
            .iter()
            .find(|currency| currency.code == self.0)
        {
            Some(currency) => currency.symbol,
            None => self.as_str(),
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::canonical()
    }
}

impl FromStr for CurrencyCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();

        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidCurrencyCode(s.to_owned()));
        }

        Ok(Self(code.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The code of the currency all amounts are persisted in.
pub const CANONICAL_CURRENCY: &str = "USD";

/// A currency the user can pick in the display currency selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCurrency {
    /// The currency code, e.g. "EUR".
    pub code: &'static str,
    /// The symbol for the currency, e.g. "€".
    pub symbol: &'static str,
}

/// The currencies offered in the selector, in display order.
pub const DISPLAY_CURRENCIES: [DisplayCurrency; 3] = [
    DisplayCurrency {
        code: "USD",
        symbol: "$",
    },
    DisplayCurrency {
        code: "INR",
        symbol: "₹",
    },
    DisplayCurrency {
        code: "EUR",
        symbol: "€",
    },
];

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::CurrencyCode;

    #[test]
    fn parses_and_normalises_case() {
        let code: CurrencyCode = " eur ".parse().unwrap();

        assert_eq!(code.as_str(), "EUR");
    }

    #[test]
    fn rejects_codes_that_are_not_three_letters() {
        for input in ["", "US", "USDT", "U5D", "€€€"] {
            assert_eq!(
                input.parse::<CurrencyCode>(),
                Err(Error::InvalidCurrencyCode(input.to_owned())),
                "want {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn canonical_is_usd() {
        assert!(CurrencyCode::canonical().is_canonical());
        assert_eq!(CurrencyCode::default().as_str(), "USD");
        assert!(!"EUR".parse::<CurrencyCode>().unwrap().is_canonical());
    }

    #[test]
    fn symbol_falls_back_to_code() {
        assert_eq!("INR".parse::<CurrencyCode>().unwrap().symbol(), "₹");
        assert_eq!("GBP".parse::<CurrencyCode>().unwrap().symbol(), "GBP");
    }

    #[test]
    fn deserializes_from_json_string() {
        let code: CurrencyCode = serde_json::from_str("\"inr\"").unwrap();
        assert_eq!(code.as_str(), "INR");

        assert!(serde_json::from_str::<CurrencyCode>("\"rupees\"").is_err());
    }
}
