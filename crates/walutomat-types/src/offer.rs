//! Order book offers with decimal precision

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyPair;
use crate::decimal::deserialize_decimal;
use crate::time::deserialize_optional_timestamp;

/// A single price level in the P2P order book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Price in COUNTER per one BASE
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price: Decimal,
    /// Volume available at this price, in BASE
    #[serde(deserialize_with = "deserialize_decimal")]
    pub volume: Decimal,
}

impl Offer {
    /// Create a new offer
    pub fn new(price: Decimal, volume: Decimal) -> Self {
        Self { price, volume }
    }

    /// Value of the whole offer in COUNTER
    pub fn notional(&self) -> Decimal {
        self.price * self.volume
    }

    /// Check if this offer has zero volume
    pub fn is_empty(&self) -> bool {
        self.volume.is_zero()
    }
}

/// Both sides of the book for one pair
///
/// Bids are kept best (highest) first and asks best (lowest) first.
/// Use [`OrderBook::from_unsorted`] or [`OrderBook::sort`] when the
/// ordering of incoming data is not guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    /// Server time of the snapshot
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub ts: Option<DateTime<Utc>>,
    /// Pair this book belongs to
    #[serde(default)]
    pub currency_pair: Option<CurrencyPair>,
    /// Buy offers, highest price first
    #[serde(default)]
    pub bids: Vec<Offer>,
    /// Sell offers, lowest price first
    #[serde(default)]
    pub asks: Vec<Offer>,
}

impl OrderBook {
    /// Build a book from offers in arbitrary order
    pub fn from_unsorted(bids: Vec<Offer>, asks: Vec<Offer>) -> Self {
        let mut book = Self {
            bids,
            asks,
            ..Default::default()
        };
        book.sort();
        book
    }

    /// Sort bids descending and asks ascending by price
    pub fn sort(&mut self) {
        self.bids.sort_by(|a, b| b.price.cmp(&a.price));
        self.asks.sort_by(|a, b| a.price.cmp(&b.price));
    }

    /// Highest bid
    pub fn best_bid(&self) -> Option<&Offer> {
        self.bids.first()
    }

    /// Lowest ask
    pub fn best_ask(&self) -> Option<&Offer> {
        self.asks.first()
    }

    /// Ask minus bid
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// Midpoint between best bid and best ask
    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.best_ask()?.price + self.best_bid()?.price) / Decimal::TWO)
    }

    /// Total volume on the bid side
    pub fn bid_depth(&self) -> Decimal {
        self.bids.iter().map(|o| o.volume).sum()
    }

    /// Total volume on the ask side
    pub fn ask_depth(&self) -> Decimal {
        self.asks.iter().map(|o| o.volume).sum()
    }
}
