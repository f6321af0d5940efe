//! Decimal deserializers that never go through `f64`
//!
//! The API sends amounts as JSON strings ("100.00"), but some fields
//! (`completion`, offer volumes on older endpoints) arrive as JSON numbers.

use rust_decimal::Decimal;
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

fn parse<E: Error>(value: StringOrNumber) -> Result<Decimal, E> {
    let s = match value {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    };

    if s.contains('e') || s.contains('E') {
        Decimal::from_scientific(&s).map_err(E::custom)
    } else {
        Decimal::from_str(&s).map_err(E::custom)
    }
}

pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    parse(StringOrNumber::deserialize(deserializer)?)
}

pub(crate) fn deserialize_optional_decimal<'de, D>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer)?
        .map(parse)
        .transpose()
}
