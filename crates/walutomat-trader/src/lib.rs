//! Trading helpers for the Walutomat P2P exchange
//!
//! Builds on [`walutomat_rest`] with the operations a trading script needs:
//!
//! - **Order placement**: sell or buy the whole available balance
//! - **Pricing**: volume-weighted bid/ask for a given size, widening the
//!   fetched depth when the book is too shallow
//! - **Tracking**: poll an order until it can no longer fill, with a
//!   deadline and cooperative cancellation
//!
//! Dry-run mode is configured on the REST client
//! ([`ClientConfig::with_dry_run`](walutomat_rest::ClientConfig::with_dry_run));
//! the trader then reports [`IssuedOrder::DryRun`] instead of placing orders.

pub mod error;
pub mod estimator;
pub mod trader;

pub use error::{TraderError, TraderResult};
pub use estimator::{price_by_volume, EstimateError, MissingVolume};
pub use trader::{
    CancellationHandle, CancellationSignal, IssuedOrder, Trader, WaitOptions, MAX_BOOK_ATTEMPTS,
};
