//! Canonical request message and timestamp
//!
//! Walutomat signs `timestamp + path`, followed by either the raw request
//! body or, when there is no body, `?` and the query string. When a request
//! carries both a body and a query, the query is left out of the signed
//! message; the server verifies against this exact form.

use chrono::{DateTime, Utc};

/// Layout of the `X-API-Timestamp` header
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Render an instant as an `X-API-Timestamp` value (UTC, whole seconds)
pub fn request_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Build the message that gets signed for a request
///
/// # Arguments
/// * `timestamp` - Value sent in `X-API-Timestamp`
/// * `path` - URL path (e.g., "/api/v2.0.0/account/balances")
/// * `query` - Encoded query string without the leading `?`
/// * `body` - Encoded request body, if the request has one
pub fn canonical_message(
    timestamp: &str,
    path: &str,
    query: Option<&str>,
    body: Option<&[u8]>,
) -> Vec<u8> {
    let mut message = Vec::with_capacity(
        timestamp.len() + path.len() + body.map_or(0, <[u8]>::len) + query.map_or(0, str::len) + 1,
    );
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(path.as_bytes());

    match (body, query) {
        (Some(body), _) => message.extend_from_slice(body),
        (None, Some(query)) if !query.is_empty() => {
            message.push(b'?');
            message.extend_from_slice(query.as_bytes());
        }
        (None, _) => {}
    }

    message
}
