//! Error types for trading operations

use crate::estimator::{EstimateError, MissingVolume};
use std::time::Duration;
use thiserror::Error;
use walutomat_rest::RestError;

/// Errors returned by [`Trader`](crate::Trader)
#[derive(Error, Debug)]
pub enum TraderError {
    /// REST call failed
    #[error(transparent)]
    Rest(#[from] RestError),

    /// Price estimation failed for a reason retries cannot fix
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    /// The book stayed too shallow after widening
    #[error("Order book too shallow after {attempts} attempts (missing {last_missing})")]
    RetryExhausted {
        attempts: u32,
        last_missing: MissingVolume,
    },

    /// Arguments rejected before any request was made
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The exchange returned no order for the id
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Waiting exceeded its deadline
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Waiting was cancelled by the caller
    #[error("Cancelled")]
    Cancelled,
}

/// Result type for trading operations
pub type TraderResult<T> = Result<T, TraderError>;
