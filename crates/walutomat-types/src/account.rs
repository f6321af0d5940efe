//! Wallet balances

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::currency::Currency;
use crate::decimal::deserialize_decimal;

/// Balance of a single currency wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBalance {
    pub currency: Currency,
    /// Total funds (`available + reserved`)
    #[serde(rename = "balanceTotal", deserialize_with = "deserialize_decimal")]
    pub total: Decimal,
    /// Funds that can be used for new orders or withdrawals
    #[serde(rename = "balanceAvailable", deserialize_with = "deserialize_decimal")]
    pub available: Decimal,
    /// Funds locked by active orders
    #[serde(rename = "balanceReserved", deserialize_with = "deserialize_decimal")]
    pub reserved: Decimal,
}

impl CurrencyBalance {
    /// Whether `total == available + reserved`
    ///
    /// The server is trusted on this; the check is only informational.
    pub fn is_consistent(&self) -> bool {
        self.total == self.available + self.reserved
    }
}

impl fmt::Display for CurrencyBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>12} {} = {:>12} + {:>12}",
            self.total, self.currency, self.available, self.reserved
        )
    }
}

/// Balances of all wallets, keyed by currency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CurrencyBalance>", into = "Vec<CurrencyBalance>")]
pub struct AccountBalances {
    balances: BTreeMap<Currency, CurrencyBalance>,
}

impl AccountBalances {
    /// Balance for a currency, if the account has that wallet
    pub fn get(&self, currency: Currency) -> Option<&CurrencyBalance> {
        self.balances.get(&currency)
    }

    /// Available funds, zero when the wallet does not exist
    pub fn available(&self, currency: Currency) -> Decimal {
        self.get(currency).map(|b| b.available).unwrap_or_default()
    }

    /// Iterate balances in currency order
    pub fn iter(&self) -> impl Iterator<Item = &CurrencyBalance> {
        self.balances.values()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl From<Vec<CurrencyBalance>> for AccountBalances {
    fn from(list: Vec<CurrencyBalance>) -> Self {
        Self {
            balances: list.into_iter().map(|b| (b.currency, b)).collect(),
        }
    }
}

impl From<AccountBalances> for Vec<CurrencyBalance> {
    fn from(balances: AccountBalances) -> Self {
        balances.balances.into_values().collect()
    }
}

impl fmt::Display for AccountBalances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for balance in self.iter() {
            writeln!(f, "{}", balance)?;
        }
        Ok(())
    }
}
