//! P2P order endpoints
//!
//! Live submissions always carry a `submitId`, which the exchange uses to
//! deduplicate retries. Dry runs never carry one.

use crate::client::WalutomatRestClient;
use crate::error::RestResult;
use crate::transport::HttpTransport;
use crate::types::{OrderSubmitted, SubmitOrderRequest, ACTIVE_ORDERS, CLOSE_ORDER, ORDERS};
use chrono::SecondsFormat;
use futures::Stream;
use reqwest::Method;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use walutomat_types::Order;

use super::paginate;

/// Order endpoints
pub struct OrderEndpoints<'a, T: HttpTransport> {
    client: &'a WalutomatRestClient<T>,
}

impl<'a, T: HttpTransport> OrderEndpoints<'a, T> {
    pub fn new(client: &'a WalutomatRestClient<T>) -> Self {
        Self { client }
    }

    /// Get an order by exchange id
    ///
    /// The exchange answers with a list; it is empty for unknown ids.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> RestResult<Vec<Order>> {
        let params = [("orderId", order_id.to_string())];
        self.client.execute_as(Method::GET, ORDERS, &params, None).await
    }

    /// Stream active orders, newest first
    ///
    /// Follow-up pages select orders older than the last `submitTs` seen.
    pub fn active(&self, item_limit: u32) -> impl Stream<Item = RestResult<Order>> + 'a {
        paginate(
            self.client,
            ACTIVE_ORDERS,
            vec![("itemLimit", item_limit.to_string())],
            item_limit,
            |last: &Order| {
                (
                    "olderThan",
                    last.submit_ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                )
            },
        )
    }

    /// Submit an order
    ///
    /// The request is sent as a dry run when either the request or the
    /// client asks for it. Otherwise a missing `submit_id` is filled with a
    /// fresh UUID v4.
    #[instrument(skip(self, request), fields(pair = %request.currency_pair, side = %request.side))]
    pub async fn submit_order(&self, request: &SubmitOrderRequest) -> RestResult<OrderSubmitted> {
        let dry_run = request.dry_run || self.client.is_dry_run();

        let mut request = request.clone();
        if !dry_run && request.submit_id.is_none() {
            request.submit_id = Some(Uuid::new_v4().to_string());
        }
        let form = request.to_form(dry_run);

        debug!(
            volume = %request.volume,
            volume_currency = %request.volume_currency,
            limit_price = %request.limit_price,
            dry_run,
            "Submitting order"
        );

        let submitted: OrderSubmitted = self
            .client
            .execute_as(Method::POST, ORDERS, &[], Some(&form))
            .await?;

        info!(
            order_id = submitted.order_id.as_deref().unwrap_or("-"),
            submit_id = request.submit_id.as_deref().unwrap_or("-"),
            dry_run,
            "Order submitted"
        );

        Ok(submitted)
    }

    /// Cancel an active order
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str) -> RestResult<()> {
        let form = [("orderId", order_id.to_string())];
        self.client
            .execute(Method::POST, CLOSE_ORDER, &[], Some(&form))
            .await?;

        info!(order_id, "Order cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::error::RestError;
    use futures::TryStreamExt;
    use crate::transport::MockTransport;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use walutomat_auth::Credentials;
    use walutomat_types::{Currency, CurrencyPair, OrderStatus, Side};

    const TEST_KEY: &str = include_str!("../../tests/fixtures/test_key.pem");

    fn client_with(config: ClientConfig) -> WalutomatRestClient<MockTransport> {
        let config = config.with_credentials(Credentials::new("API_KEY", TEST_KEY));
        WalutomatRestClient::with_transport(config, MockTransport::new())
    }

    fn client() -> WalutomatRestClient<MockTransport> {
        client_with(ClientConfig::new())
    }

    fn order(id: &str, submit_ts: &str) -> serde_json::Value {
        json!({
            "orderId": id,
            "submitId": format!("s-{}", id),
            "submitTs": submit_ts,
            "updateTs": submit_ts,
            "status": "ACTIVE",
            "completion": 0,
            "currencyPair": "EURPLN",
            "buySell": "SELL",
            "volume": "200.00",
            "volumeCurrency": "EUR",
            "limitPrice": "4.51"
        })
    }

    fn sell_request() -> SubmitOrderRequest {
        SubmitOrderRequest::new(
            CurrencyPair::EURPLN,
            Side::Sell,
            dec!(200.00),
            Currency::Eur,
            dec!(4.51),
        )
    }

    #[tokio::test]
    async fn test_get_order() {
        let client = client();
        client
            .transport()
            .push_result(json!([order("o-1", "2021-03-12T14:11:29.123456789Z")]));

        let orders = client.get_order("o-1").await.unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Active);
        let request = client.transport().last_request().unwrap();
        assert_eq!(request.url.path(), "/api/v2.0.0/market_fx/orders");
        assert_eq!(request.param("orderId"), Some("o-1".to_string()));
    }

    #[tokio::test]
    async fn test_active_orders_pagination() {
        let client = client();
        client.transport().push_result(json!([
            order("o-3", "2021-03-12T14:11:31.500Z"),
            order("o-2", "2021-03-12T14:11:30.250Z")
        ]));
        client
            .transport()
            .push_result(json!([order("o-1", "2021-03-12T14:11:29Z")]));

        let orders: Vec<Order> = client.active_orders(2).try_collect().await.unwrap();

        let ids: Vec<&str> = orders.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["o-3", "o-2", "o-1"]);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].param("olderThan"), None);
        assert_eq!(
            requests[1].param("olderThan"),
            Some("2021-03-12T14:11:30.250Z".to_string())
        );
        assert_eq!(requests[1].param("itemLimit"), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_live_submit_generates_submit_id() {
        let client = client();
        client.transport().push_result(json!({"orderId": "o-9"}));

        let submitted = client.submit_order(&sell_request()).await.unwrap();

        assert_eq!(submitted.order_id.as_deref(), Some("o-9"));
        let request = client.transport().last_request().unwrap();
        assert_eq!(request.method, "POST");
        let submit_id = request.param("submitId").unwrap();
        assert!(Uuid::parse_str(&submit_id).is_ok());
        assert_eq!(request.param("dryRun"), None);
        assert_eq!(request.param("volume"), Some("200.00".to_string()));
        assert_eq!(request.param("buySell"), Some("SELL".to_string()));
    }

    #[tokio::test]
    async fn test_live_submit_keeps_given_submit_id() {
        let client = client();
        client.transport().push_result(json!({"orderId": "o-9"}));

        client
            .submit_order(&sell_request().with_submit_id("my-id"))
            .await
            .unwrap();

        let request = client.transport().last_request().unwrap();
        assert_eq!(request.param("submitId"), Some("my-id".to_string()));
    }

    #[tokio::test]
    async fn test_dry_run_request_never_sends_submit_id() {
        let client = client();
        client.transport().push_result(json!({}));

        let submitted = client
            .submit_order(&sell_request().with_submit_id("ignored").dry_run(true))
            .await
            .unwrap();

        assert!(submitted.order_id.is_none());
        let request = client.transport().last_request().unwrap();
        assert_eq!(request.param("submitId"), None);
        assert_eq!(request.param("dryRun"), Some("true".to_string()));
    }

    #[tokio::test]
    async fn test_client_wide_dry_run() {
        let client = client_with(ClientConfig::new().with_dry_run(true));
        client.transport().push_result(json!({}));

        client.submit_order(&sell_request()).await.unwrap();

        let request = client.transport().last_request().unwrap();
        assert_eq!(request.param("submitId"), None);
        assert_eq!(request.param("dryRun"), Some("true".to_string()));
    }

    #[tokio::test]
    async fn test_submit_rejected() {
        let client = client();
        client
            .transport()
            .push_api_errors(&[("INSUFFICIENT_FUNDS", "Not enough funds")]);

        let err = client.submit_order(&sell_request()).await.unwrap_err();
        assert!(matches!(err, RestError::Api(_)));
    }

    #[tokio::test]
    async fn test_cancel_order() {
        let client = client();
        client.transport().push_result(json!({"orderId": "o-1"}));

        client.cancel_order("o-1").await.unwrap();

        let request = client.transport().last_request().unwrap();
        assert_eq!(request.url.path(), "/api/v2.0.0/market_fx/orders/close");
        assert_eq!(request.form(), vec![("orderId".to_string(), "o-1".to_string())]);
    }
}
