//! Error types for authentication operations

/// Errors that can occur while loading credentials or signing requests
///
/// None of these are retryable: they all point at bad configuration.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// PEM material could not be parsed into an RSA private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Private key file could not be read
    #[error("Cannot read private key file {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
