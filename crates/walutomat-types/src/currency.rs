//! Currencies and currency pairs (EURPLN format)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Currency traded on the P2P market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro
    Eur,
    /// British pound
    Gbp,
    /// US dollar
    Usd,
    /// Swiss franc
    Chf,
    /// Polish zloty
    Pln,
}

impl Currency {
    /// All supported currencies
    pub const ALL: [Currency; 5] = [Self::Eur, Self::Gbp, Self::Usd, Self::Chf, Self::Pln];

    /// Returns the ISO 4217 code as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Usd => "USD",
            Self::Chf => "CHF",
            Self::Pln => "PLN",
        }
    }
}

impl FromStr for Currency {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency pair in BASE/COUNTER order, serialized as a 6-letter code
///
/// Prices on the venue are always quoted as COUNTER per one BASE
/// (e.g. EURPLN = 4.5797 means 4.5797 PLN for 1 EUR).
///
/// Base and counter are expected to differ; this is not enforced on
/// construction, see [`CurrencyPair::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    /// Base currency
    pub base: Currency,
    /// Counter (quote) currency
    pub counter: Currency,
}

impl CurrencyPair {
    pub const EURGBP: Self = Self::new(Currency::Eur, Currency::Gbp);
    pub const EURUSD: Self = Self::new(Currency::Eur, Currency::Usd);
    pub const EURCHF: Self = Self::new(Currency::Eur, Currency::Chf);
    pub const EURPLN: Self = Self::new(Currency::Eur, Currency::Pln);
    pub const GBPUSD: Self = Self::new(Currency::Gbp, Currency::Usd);
    pub const GBPCHF: Self = Self::new(Currency::Gbp, Currency::Chf);
    pub const GBPPLN: Self = Self::new(Currency::Gbp, Currency::Pln);
    pub const USDCHF: Self = Self::new(Currency::Usd, Currency::Chf);
    pub const USDPLN: Self = Self::new(Currency::Usd, Currency::Pln);
    pub const CHFPLN: Self = Self::new(Currency::Chf, Currency::Pln);

    /// Pairs listed on the P2P market
    pub const LISTED: [CurrencyPair; 10] = [
        Self::EURGBP,
        Self::EURUSD,
        Self::EURCHF,
        Self::EURPLN,
        Self::GBPUSD,
        Self::GBPCHF,
        Self::GBPPLN,
        Self::USDCHF,
        Self::USDPLN,
        Self::CHFPLN,
    ];

    /// Create a new pair
    pub const fn new(base: Currency, counter: Currency) -> Self {
        Self { base, counter }
    }

    /// True when base and counter differ
    pub fn is_valid(&self) -> bool {
        self.base != self.counter
    }

    /// True when the pair is quoted on the P2P market
    pub fn is_listed(&self) -> bool {
        Self::LISTED.contains(self)
    }

    /// Returns the other currency of the pair, if `currency` belongs to it
    pub fn other(&self, currency: Currency) -> Option<Currency> {
        if currency == self.base {
            Some(self.counter)
        } else if currency == self.counter {
            Some(self.base)
        } else {
            None
        }
    }

    /// Check if the pair contains the currency
    pub fn contains(&self, currency: Currency) -> bool {
        self.base == currency || self.counter == currency
    }
}

impl FromStr for CurrencyPair {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.is_ascii() {
            return Err(ParseError::InvalidPair(s.to_string()));
        }

        let (base, counter) = s.split_at(3);
        let base = base
            .parse()
            .map_err(|_| ParseError::InvalidPair(s.to_string()))?;
        let counter = counter
            .parse()
            .map_err(|_| ParseError::InvalidPair(s.to_string()))?;

        Ok(Self { base, counter })
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.counter)
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("PLN".parse::<Currency>().unwrap(), Currency::Pln);
        assert!("eur".parse::<Currency>().is_err());
        assert!("SEK".parse::<Currency>().is_err());
    }

    #[test]
    fn test_pair_display() {
        let pair = CurrencyPair::new(Currency::Eur, Currency::Pln);
        assert_eq!(pair.to_string(), "EURPLN");
        assert_eq!(pair, CurrencyPair::EURPLN);
    }

    #[test]
    fn test_pair_parse() {
        let pair: CurrencyPair = "EURPLN".parse().unwrap();
        assert_eq!(pair.base, Currency::Eur);
        assert_eq!(pair.counter, Currency::Pln);
    }

    #[test]
    fn test_pair_parse_error() {
        assert!("EURPL".parse::<CurrencyPair>().is_err());
        assert!("EUR/PLN".parse::<CurrencyPair>().is_err());
        assert!("EURXYZ".parse::<CurrencyPair>().is_err());
        assert!("".parse::<CurrencyPair>().is_err());
        assert!("EURPŁ".parse::<CurrencyPair>().is_err());
    }

    #[test]
    fn test_pair_serde() {
        let json = serde_json::to_string(&CurrencyPair::GBPUSD).unwrap();
        assert_eq!(json, "\"GBPUSD\"");

        let parsed: CurrencyPair = serde_json::from_str("\"CHFPLN\"").unwrap();
        assert_eq!(parsed, CurrencyPair::CHFPLN);

        assert!(serde_json::from_str::<CurrencyPair>("\"CHF\"").is_err());
    }

    #[test]
    fn test_pair_validity() {
        assert!(CurrencyPair::EURPLN.is_valid());
        assert!(!CurrencyPair::new(Currency::Eur, Currency::Eur).is_valid());
        assert!(CurrencyPair::USDPLN.is_listed());
        assert!(!CurrencyPair::new(Currency::Pln, Currency::Eur).is_listed());
    }

    #[test]
    fn test_pair_other() {
        let pair = CurrencyPair::EURPLN;
        assert_eq!(pair.other(Currency::Eur), Some(Currency::Pln));
        assert_eq!(pair.other(Currency::Pln), Some(Currency::Eur));
        assert_eq!(pair.other(Currency::Usd), None);
        assert!(pair.contains(Currency::Pln));
    }
}
