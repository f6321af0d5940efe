//! Request signing for the Walutomat REST API 2.0
//!
//! Every Walutomat API call carries three headers:
//!
//! - `X-API-Key` - the API key
//! - `X-API-Timestamp` - UTC time, `YYYY-MM-DDTHH:MM:SSZ`
//! - `X-API-Signature` - base64 RSA-SHA256 signature of the canonical message
//!
//! # Example
//!
//! ```no_run
//! use walutomat_auth::{Credentials, RequestSigner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load credentials from environment
//! let creds = Credentials::from_env()?;
//! creds.validate()?;
//!
//! let signer = RequestSigner::new(&creds);
//! let headers = signer.sign("/api/v2.0.0/account/balances", None, None)?;
//! println!("X-API-Signature: {}", headers.signature);
//! # Ok(())
//! # }
//! ```

mod credentials;
mod error;
mod signer;

pub use credentials::{
    Credentials, RequestSigner, SignedHeaders, ENV_API_KEY, ENV_PRIVATE_KEY, ENV_PRIVATE_KEY_FILE,
};
pub use error::{AuthError, AuthResult};
pub use signer::{canonical_message, request_timestamp, TIMESTAMP_FORMAT};
