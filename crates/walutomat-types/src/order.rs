//! P2P order as reported by the exchange

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::currency::{Currency, CurrencyPair};
use crate::decimal::{deserialize_decimal, deserialize_optional_decimal};
use crate::enums::{OrderStatus, Side};
use crate::time::deserialize_timestamp;

/// Completion percentage of a fully executed order
pub const FULL_COMPLETION: Decimal = Decimal::ONE_HUNDRED;

/// A P2P order
///
/// The client only observes orders by polling; the exchange owns the
/// authoritative state. Settlement fields are filled in as the order
/// executes and may be missing on freshly submitted orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Exchange-assigned identifier
    pub order_id: String,
    /// Client-assigned submission identifier (deduplication key)
    pub submit_id: String,
    /// When the order was accepted
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub submit_ts: DateTime<Utc>,
    /// Last state change
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub update_ts: DateTime<Utc>,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Filled percentage, 0-100
    #[serde(deserialize_with = "deserialize_decimal")]
    pub completion: Decimal,
    /// Traded pair
    pub currency_pair: CurrencyPair,
    /// Side with respect to `volume_currency`
    pub buy_sell: Side,
    /// Ordered volume
    #[serde(deserialize_with = "deserialize_decimal")]
    pub volume: Decimal,
    /// Currency `volume` is denominated in
    pub volume_currency: Currency,

    /// Limit price in COUNTER per one BASE
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub limit_price: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub sold_amount: Option<Decimal>,
    #[serde(default)]
    pub sold_currency: Option<Currency>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub bought_amount: Option<Decimal>,
    #[serde(default)]
    pub bought_currency: Option<Currency>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub commission_amount: Option<Decimal>,
    #[serde(default)]
    pub commission_currency: Option<Currency>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub commission_rate: Option<Decimal>,
}

impl Order {
    /// Fully filled
    pub fn is_executed(&self) -> bool {
        self.completion == FULL_COMPLETION
    }

    /// No further fills will happen (filled or closed)
    pub fn is_terminal(&self) -> bool {
        self.is_executed() || self.status == OrderStatus::Closed
    }

    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::Active
    }

    pub fn is_buy(&self) -> bool {
        self.buy_sell == Side::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.buy_sell == Side::Sell
    }

    /// Volume still waiting to be filled
    pub fn remaining_volume(&self) -> Decimal {
        let filled = self.volume * self.completion / FULL_COMPLETION;
        (self.volume - filled).max(Decimal::ZERO)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.order_id, self.buy_sell, self.volume, self.volume_currency, self.currency_pair
        )?;
        if let Some(price) = self.limit_price {
            write!(f, " @ {}", price)?;
        }
        write!(f, " [{} {}%]", self.status, self.completion)
    }
}
