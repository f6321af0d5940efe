//! Types for Walutomat REST API requests and responses

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use walutomat_types::{Currency, CurrencyPair, Side, SortOrder};

// ============================================================================
// Paths
// ============================================================================

pub const ACCOUNT_BALANCES: &str = "/api/v2.0.0/account/balances";
pub const ACCOUNT_HISTORY: &str = "/api/v2.0.0/account/history";
pub const BEST_OFFERS: &str = "/api/v2.0.0/market_fx/best_offers";
pub const BEST_OFFERS_DETAILED: &str = "/api/v2.0.0/market_fx/best_offers/detailed";
pub const ACTIVE_ORDERS: &str = "/api/v2.0.0/market_fx/orders/active";
pub const ORDERS: &str = "/api/v2.0.0/market_fx/orders";
pub const CLOSE_ORDER: &str = "/api/v2.0.0/market_fx/orders/close";

/// Default page size for account history
pub const DEFAULT_HISTORY_LIMIT: u32 = 200;
/// Default page size for order book and active orders
pub const DEFAULT_ITEM_LIMIT: u32 = 10;

// ============================================================================
// API Response Wrapper
// ============================================================================

/// Standard Walutomat response envelope
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    /// Missing on malformed responses
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Option<Vec<ApiErrorEntry>>,
}

/// One entry of the `errors` list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorEntry {
    pub key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "errorData")]
    pub error_data: Option<serde_json::Value>,
}

/// The request behind an API error, safe to log
///
/// The API key is abbreviated and the signature replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    pub method: String,
    pub url: String,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RequestSnapshot {
    pub(crate) fn of(request: &reqwest::Request) -> Self {
        let headers = request
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = value.to_str().unwrap_or_default();
                let value = match name.as_str() {
                    "x-api-signature" => "[REDACTED]".to_string(),
                    "x-api-key" => format!("{}...", value.chars().take(8).collect::<String>()),
                    _ => value.to_string(),
                };
                (name.to_string(), value)
            })
            .collect();

        Self {
            method: request.method().to_string(),
            url: request.url().to_string(),
            body: request
                .body()
                .and_then(reqwest::Body::as_bytes)
                .map(|b| String::from_utf8_lossy(b).into_owned()),
            headers,
        }
    }
}

// ============================================================================
// Trading Types
// ============================================================================

/// Order submission parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOrderRequest {
    /// Idempotency key; generated when absent in live mode, never sent in dry run
    pub submit_id: Option<String>,
    pub currency_pair: CurrencyPair,
    pub side: Side,
    pub volume: Decimal,
    pub volume_currency: Currency,
    /// Price in COUNTER per one BASE
    pub limit_price: Decimal,
    /// Validate without placing the order
    pub dry_run: bool,
}

impl SubmitOrderRequest {
    pub fn new(
        currency_pair: CurrencyPair,
        side: Side,
        volume: Decimal,
        volume_currency: Currency,
        limit_price: Decimal,
    ) -> Self {
        Self {
            submit_id: None,
            currency_pair,
            side,
            volume,
            volume_currency,
            limit_price,
            dry_run: false,
        }
    }

    pub fn with_submit_id(mut self, submit_id: impl Into<String>) -> Self {
        self.submit_id = Some(submit_id.into());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Form parameters; `submitId` must already be resolved for live orders
    pub(crate) fn to_form(&self, dry_run: bool) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("currencyPair", self.currency_pair.to_string()),
            ("buySell", self.side.as_str().to_string()),
            ("volume", self.volume.to_string()),
            ("volumeCurrency", self.volume_currency.as_str().to_string()),
            ("limitPrice", self.limit_price.to_string()),
        ];
        if dry_run {
            form.push(("dryRun", "true".to_string()));
        } else if let Some(submit_id) = &self.submit_id {
            form.push(("submitId", submit_id.clone()));
        }
        form
    }
}

/// Result of an order submission
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmitted {
    /// Exchange order id; dry runs may omit it
    #[serde(default)]
    pub order_id: Option<String>,
    /// Remaining fields (dry runs report the would-be settlement)
    #[serde(flatten)]
    pub details: HashMap<String, serde_json::Value>,
}

// ============================================================================
// Account Types
// ============================================================================

/// Filters for the account history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// Empty means all currencies
    pub currencies: Vec<Currency>,
    pub operation_type: Option<String>,
    /// Page size
    pub item_limit: u32,
    /// Resume after this `historyItemId`
    pub continue_from: Option<u64>,
    pub sort_order: SortOrder,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            date_from: None,
            date_to: None,
            currencies: Vec::new(),
            operation_type: None,
            item_limit: DEFAULT_HISTORY_LIMIT,
            continue_from: None,
            sort_order: SortOrder::Desc,
        }
    }
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, date: DateTime<Utc>) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn until(mut self, date: DateTime<Utc>) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currencies.push(currency);
        self
    }

    pub fn operation_type(mut self, operation_type: impl Into<String>) -> Self {
        self.operation_type = Some(operation_type.into());
        self
    }

    pub fn item_limit(mut self, item_limit: u32) -> Self {
        self.item_limit = item_limit;
        self
    }

    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(date) = self.date_from {
            params.push(("dateFrom", date.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        }
        if let Some(date) = self.date_to {
            params.push(("dateTo", date.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        }
        if !self.currencies.is_empty() {
            let currencies: Vec<&str> = self.currencies.iter().map(Currency::as_str).collect();
            params.push(("currencies", currencies.join(",")));
        }
        if let Some(operation_type) = &self.operation_type {
            params.push(("operationType", operation_type.clone()));
        }
        params.push(("itemLimit", self.item_limit.to_string()));
        if let Some(continue_from) = self.continue_from {
            params.push(("continueFrom", continue_from.to_string()));
        }
        params.push(("sortOrder", self.sort_order.as_str().to_string()));
        params
    }
}
