//! Error types for parsing Walutomat payloads

use thiserror::Error;

/// Errors raised while turning raw API values into typed records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Currency code not supported by the P2P market
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// Currency pair code is not two concatenated 3-letter codes
    #[error("invalid currency pair: {0} (expected format: BASECOUNTER, e.g., EURPLN)")]
    InvalidPair(String),

    /// Unknown enum value (side, status, ...)
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// Timestamp did not match the expected layout
    #[error("invalid timestamp {value}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::InvalidPair("EURPL".to_string());
        assert!(err.to_string().contains("EURPL"));

        let err = ParseError::UnknownVariant {
            kind: "side",
            value: "HOLD".to_string(),
        };
        assert_eq!(err.to_string(), "unknown side: HOLD");
    }
}
