//! Account history entries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::currency::Currency;
use crate::decimal::{deserialize_decimal, deserialize_optional_decimal};
use crate::time::deserialize_timestamp;

/// One balance-changing operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Sequential id, used as the pagination cursor
    pub history_item_id: u64,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub ts: DateTime<Utc>,
    /// Signed amount of the operation
    #[serde(deserialize_with = "deserialize_decimal")]
    pub operation_amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub balance_after: Option<Decimal>,
    pub currency: Currency,
    /// e.g. `MARKET_FX`, `PAYIN`, `PAYOUT`
    pub operation_type: String,
    #[serde(default)]
    pub operation_detailed_type: Option<String>,
    /// Operation-specific fields (submitId, currencyPair, ...)
    #[serde(flatten)]
    pub details: HashMap<String, serde_json::Value>,
}

impl HistoryItem {
    pub fn is_credit(&self) -> bool {
        self.operation_amount.is_sign_positive() && !self.operation_amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_history_item_parsing() {
        let json = r#"{
            "historyItemId": 7331,
            "transactionId": "tx-1",
            "ts": "2021-03-12T14:11:29.123Z",
            "operationAmount": "-100.00",
            "balanceAfter": "900.00",
            "currency": "EUR",
            "operationType": "MARKET_FX",
            "operationDetailedType": "MARKET_FX_SELL",
            "submitId": "3d4a2181-44c7-4b8a-a82d-f889dcba401f",
            "currencyPair": "EURPLN"
        }"#;
        let item: HistoryItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.history_item_id, 7331);
        assert_eq!(item.operation_amount, dec!(-100));
        assert_eq!(item.balance_after, Some(dec!(900)));
        assert!(!item.is_credit());
        assert_eq!(
            item.details.get("currencyPair").and_then(|v| v.as_str()),
            Some("EURPLN")
        );
    }
}
