//! REST API client for the Walutomat P2P currency exchange
//!
//! This crate provides a signed client for the Walutomat API 2.0,
//! covering account data, market depth, and order management.
//!
//! # Features
//!
//! - **Account**: Balances and paginated operation history
//! - **Market Data**: Best offers and detailed order book
//! - **Orders**: Submit (live or dry run), query, list active, cancel
//!
//! # Authentication
//!
//! Every request is signed with the account's RSA private key; see
//! [`walutomat_auth`] for the canonical message. The signature covers the
//! exact path, query and body that are sent.
//!
//! # Example
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use walutomat_rest::{ClientConfig, Credentials, HistoryQuery, WalutomatRestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::sandbox().with_credentials(Credentials::from_env()?);
//!     let client = WalutomatRestClient::with_config(config);
//!
//!     let balances = client.get_account_balances().await?;
//!     println!("{}", balances);
//!
//!     let mut history = Box::pin(client.account_history(HistoryQuery::new().item_limit(50)));
//!     while let Some(item) = history.try_next().await? {
//!         println!("{} {} {}", item.ts, item.operation_amount, item.currency);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! Enable the `test-utils` feature for [`transport::MockTransport`], which
//! records requests and replays queued responses without a network.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{ClientConfig, WalutomatRestClient, DEFAULT_HOST, SANDBOX_HOST};
pub use error::{ApiError, RestError, RestResult};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportConfig, TransportError};
pub use walutomat_auth::Credentials;

#[cfg(any(test, feature = "test-utils"))]
pub use transport::{MockTransport, RecordedRequest};

// Re-export request/response types
pub use types::{
    ApiErrorEntry, HistoryQuery, OrderSubmitted, RequestSnapshot, SubmitOrderRequest,
    DEFAULT_HISTORY_LIMIT, DEFAULT_ITEM_LIMIT,
};
