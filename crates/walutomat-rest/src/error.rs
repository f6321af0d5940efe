//! Error types for REST API operations

use crate::transport::TransportError;
use crate::types::{ApiErrorEntry, RequestSnapshot};
use walutomat_auth::AuthError;

/// Error envelope returned by the exchange, with the request that caused it
///
/// Formatting is kept out of construction: use [`ApiError::short`] for a
/// one-line summary and [`ApiError::render`] for a full diagnostic dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Request as it was sent
    pub request: RequestSnapshot,
    /// Errors listed in the envelope
    pub errors: Vec<ApiErrorEntry>,
}

impl ApiError {
    pub fn new(request: RequestSnapshot, errors: Vec<ApiErrorEntry>) -> Self {
        Self { request, errors }
    }

    /// Machine-readable error keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.key.as_str())
    }

    /// Check whether any error carries `key`
    pub fn has_key(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }

    /// `key: description` pairs joined with `; `
    pub fn short(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.key, e.description))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Multi-line dump of the request and every error entry
    pub fn render(&self) -> String {
        let mut out = format!("{} {}\n", self.request.method, self.request.url);
        if let Some(body) = &self.request.body {
            out.push_str(body);
            out.push('\n');
        }
        out.push_str("--- HEADERS ---\n");
        for (name, value) in &self.request.headers {
            out.push_str(&format!("{}: {}\n", name, value));
        }
        out.push_str("--- ERRORS ---\n");
        for error in &self.errors {
            out.push_str(&format!("{}: {}\n", error.key, error.description));
            if let Some(data) = &error.error_data {
                out.push_str(&format!("{}\n", data));
            }
        }
        out
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API error: {} @ {}", self.short(), self.request.url)
    }
}

impl std::error::Error for ApiError {}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Transport failed before a response was received
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Credentials could not sign the request
    #[error("Signing failed: {0}")]
    Auth(#[from] AuthError),

    /// Missing API credentials
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// API returned an error envelope
    #[error(transparent)]
    Api(Box<ApiError>),

    /// Envelope did not follow the `{success, result, errors}` contract
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Response body could not be decoded
    #[error("Parse error (HTTP {status}): {message}")]
    Parse {
        /// HTTP status of the response
        status: u16,
        /// Decoder message
        message: String,
    },

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl From<ApiError> for RestError {
    fn from(e: ApiError) -> Self {
        Self::Api(Box::new(e))
    }
}

impl RestError {
    /// API error details, if the exchange rejected the request
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Error keys reported by the exchange (empty for non-API errors)
    pub fn api_error_keys(&self) -> Vec<&str> {
        self.api_error()
            .map(|e| e.keys().collect())
            .unwrap_or_default()
    }

    /// Check if this error is transient
    ///
    /// Only transport failures qualify; API, signing and protocol errors
    /// will fail the same way on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(TransportError::Timeout | TransportError::Connect(_))
        )
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
