//! Common test utilities and fixtures for trader integration tests
//!
//! JSON payloads mirror the `result` field of Walutomat API 2.0 responses

#![allow(dead_code)]

use serde_json::{json, Value};
use walutomat_rest::{ClientConfig, Credentials, MockTransport, WalutomatRestClient};
use walutomat_trader::Trader;

pub const TEST_KEY: &str = include_str!("../fixtures/test_key.pem");

/// Balances with 200 EUR and 150 PLN available
pub const BALANCES: &str = r#"[
    {
        "currency": "EUR",
        "balanceTotal": "250.00",
        "balanceAvailable": "200.00",
        "balanceReserved": "50.00"
    },
    {
        "currency": "PLN",
        "balanceTotal": "150.00",
        "balanceAvailable": "150.00",
        "balanceReserved": "0.00"
    },
    {
        "currency": "USD",
        "balanceTotal": "0.00",
        "balanceAvailable": "0.00",
        "balanceReserved": "0.00"
    }
]"#;

/// Submission acknowledgement
pub const SUBMITTED: &str = r#"{"orderId": "d6a1b9ce-2c1a-4b6e-9c33-0b1f5f6a8d11"}"#;

pub const ORDER_ID: &str = "d6a1b9ce-2c1a-4b6e-9c33-0b1f5f6a8d11";

pub fn balances() -> Value {
    serde_json::from_str(BALANCES).unwrap()
}

pub fn submitted() -> Value {
    serde_json::from_str(SUBMITTED).unwrap()
}

/// An order in the given state, wrapped in the list the orders endpoint returns
pub fn order(status: &str, completion: &str) -> Value {
    json!([{
        "orderId": ORDER_ID,
        "submitId": "3f8e3c0a-6f4e-4a53-8c2d-7d3c1b2a9e10",
        "submitTs": "2021-03-12T14:11:29.123Z",
        "updateTs": "2021-03-12T14:12:01.987654321Z",
        "status": status,
        "completion": completion,
        "currencyPair": "EURPLN",
        "buySell": "SELL",
        "volume": "200.00",
        "volumeCurrency": "EUR",
        "limitPrice": "4.51",
        "soldAmount": "0.00",
        "soldCurrency": "EUR",
        "boughtAmount": "0.00",
        "boughtCurrency": "PLN",
        "commissionAmount": "0.00",
        "commissionCurrency": "PLN",
        "commissionRate": "0.002"
    }])
}

/// Order book with `(price, volume)` levels per side
pub fn book(bids: &[(&str, &str)], asks: &[(&str, &str)]) -> Value {
    let side = |levels: &[(&str, &str)]| -> Vec<Value> {
        levels
            .iter()
            .map(|(price, volume)| json!({"price": price, "volume": volume}))
            .collect()
    };
    json!({
        "ts": "2021-03-12T14:11:29.5Z",
        "currencyPair": "EURPLN",
        "bids": side(bids),
        "asks": side(asks)
    })
}

pub fn trader_with(config: ClientConfig) -> Trader<MockTransport> {
    let config = config.with_credentials(Credentials::new("TEST_API_KEY", TEST_KEY));
    Trader::new(WalutomatRestClient::with_transport(config, MockTransport::new()))
}

pub fn trader() -> Trader<MockTransport> {
    trader_with(ClientConfig::new())
}

pub fn mock(trader: &Trader<MockTransport>) -> &MockTransport {
    trader.client().transport()
}
