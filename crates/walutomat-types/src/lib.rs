//! Shared types for the Walutomat REST API 2.0
//!
//! This crate provides the core type definitions used across the Walutomat SDK.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Currency`], [`CurrencyPair`] - Supported currencies and P2P pairs (e.g., "EURPLN")
//! - [`Side`], [`OrderStatus`] - Order enums
//! - [`Offer`], [`OrderBook`] - Depth-of-book levels with decimal precision
//! - [`Order`] - P2P order as reported by the exchange
//! - [`AccountBalances`], [`CurrencyBalance`] - Wallet balances
//! - [`HistoryItem`] - Account history entry
//! - [`ParseError`] - Error types

pub mod account;
pub mod currency;
pub mod enums;
pub mod error;
pub mod history;
pub mod offer;
pub mod order;
pub mod time;

mod decimal;

// Re-export commonly used types
pub use account::*;
pub use currency::*;
pub use enums::*;
pub use error::*;
pub use history::*;
pub use offer::*;
pub use order::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
