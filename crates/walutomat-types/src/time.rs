//! Server timestamp parsing
//!
//! The exchange reports times like `2018-02-02T10:06:01.111Z`. Most payloads
//! carry millisecond precision, but some endpoints return up to nanoseconds,
//! so the fractional part is parsed with a variable width. Digits beyond
//! nanoseconds are dropped.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::ParseError;

/// Parse a server timestamp into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    let invalid = |reason: String| ParseError::InvalidTimestamp {
        value: value.to_string(),
        reason,
    };

    let (body, fraction) = match value.strip_suffix('Z') {
        Some(rest) => match rest.split_once('.') {
            Some((body, fraction)) => (body, fraction),
            None => (rest, ""),
        },
        None => return Err(invalid("missing trailing 'Z'".to_string())),
    };

    let naive = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| invalid(e.to_string()))?;

    if value.contains('.') && fraction.is_empty() {
        return Err(invalid("empty fractional seconds".to_string()));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("fractional seconds must be digits".to_string()));
    }

    // Right-pad to nine digits, then drop anything finer than a nanosecond
    let nanos = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));

    let naive = naive
        .with_nanosecond(nanos)
        .ok_or_else(|| invalid("fractional seconds out of range".to_string()))?;

    Ok(naive.and_utc())
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}
