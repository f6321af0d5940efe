//! Main REST client implementation

use crate::endpoints::{AccountEndpoints, MarketEndpoints, OrderEndpoints};
use crate::error::{ApiError, RestError, RestResult};
use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportConfig};
use crate::types::{ApiEnvelope, HistoryQuery, OrderSubmitted, RequestSnapshot, SubmitOrderRequest};
use futures::Stream;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};
use walutomat_auth::{Credentials, RequestSigner, SignedHeaders};
use walutomat_types::{AccountBalances, CurrencyPair, HistoryItem, Order, OrderBook};

/// Production API host
pub const DEFAULT_HOST: &str = "api.walutomat.pl";
/// Sandbox API host
pub const SANDBOX_HOST: &str = "api.walutomat.dev";

/// Default TCP/TLS connect timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3050);
/// Default whole-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const HEADER_API_KEY: HeaderName = HeaderName::from_static("x-api-key");
const HEADER_TIMESTAMP: HeaderName = HeaderName::from_static("x-api-timestamp");
const HEADER_SIGNATURE: HeaderName = HeaderName::from_static("x-api-signature");

/// Walutomat REST API client
///
/// Every Walutomat endpoint is private, so requests fail with
/// [`RestError::AuthRequired`] until credentials are configured.
///
/// # Example
///
/// ```no_run
/// use walutomat_rest::{Credentials, WalutomatRestClient};
/// use walutomat_types::CurrencyPair;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = WalutomatRestClient::new(Credentials::from_env()?);
///
///     let balances = client.get_account_balances().await?;
///     println!("{}", balances);
///
///     let book = client.get_best_offers_detailed(CurrencyPair::EURPLN, 10).await?;
///     println!("best bid: {:?}", book.best_bid());
///
///     Ok(())
/// }
/// ```
pub struct WalutomatRestClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    credentials: Option<Credentials>,
    host: String,
    timeout: Duration,
    dry_run: bool,
}

impl WalutomatRestClient<ReqwestTransport> {
    /// Create a production client with default settings
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(ClientConfig::new().with_credentials(credentials))
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = ReqwestTransport::new(TransportConfig {
            connect_timeout: config.connect_timeout,
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
        });
        Self::with_transport(config, transport)
    }
}

impl<T: HttpTransport> WalutomatRestClient<T> {
    /// Create a client that sends requests through `transport`
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        info!(host = %config.host, dry_run = config.dry_run, "Created Walutomat REST client");

        Self {
            transport,
            credentials: config.credentials,
            host: config.host,
            timeout: config.timeout,
            dry_run: config.dry_run,
        }
    }

    /// Check if the client has credentials
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Whether every order submission is forced into dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// API host requests are sent to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Dispatcher
    // ========================================================================

    /// Send a signed request and unwrap the response envelope
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `endpoint` - Absolute API path (e.g., "/api/v2.0.0/account/balances")
    /// * `params` - Query parameters
    /// * `form` - Form-encoded body parameters
    ///
    /// # Returns
    /// The envelope's `result` (`null` when absent)
    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        form: Option<&[(&str, String)]>,
    ) -> RestResult<Value> {
        self.dispatch(method, endpoint, params, form)
            .await
            .map(|(_, result)| result)
    }

    /// Like [`execute`](Self::execute), decoding the result into `R`
    pub async fn execute_as<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        form: Option<&[(&str, String)]>,
    ) -> RestResult<R> {
        let (status, result) = self.dispatch(method, endpoint, params, form).await?;
        serde_json::from_value(result).map_err(|e| RestError::Parse {
            status,
            message: e.to_string(),
        })
    }

    async fn dispatch(
        &self,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        form: Option<&[(&str, String)]>,
    ) -> RestResult<(u16, Value)> {
        let credentials = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;
        let request = self.build_request(credentials, method, endpoint, params, form)?;
        let snapshot = RequestSnapshot::of(&request);

        debug!(method = %request.method(), path = %request.url().path(), "Sending request");

        let response = self.transport.send(request).await?;
        unwrap_envelope(response, snapshot)
    }

    fn build_request(
        &self,
        credentials: &Credentials,
        method: Method,
        endpoint: &str,
        params: &[(&str, String)],
        form: Option<&[(&str, String)]>,
    ) -> RestResult<reqwest::Request> {
        let mut url = Url::parse(&format!("https://{}", self.host))
            .and_then(|base| base.join(endpoint))
            .map_err(|e| RestError::InvalidParameter(format!("{}{}: {}", self.host, endpoint, e)))?;

        if !params.is_empty() {
            let query = serde_urlencoded::to_string(params)
                .map_err(|e| RestError::InvalidParameter(e.to_string()))?;
            url.set_query(Some(&query));
        }

        let body = form
            .map(serde_urlencoded::to_string)
            .transpose()
            .map_err(|e| RestError::InvalidParameter(e.to_string()))?;

        // Sign exactly what goes on the wire
        let signed = RequestSigner::new(credentials).sign(
            url.path(),
            url.query(),
            body.as_deref().map(str::as_bytes),
        )?;

        let mut request = reqwest::Request::new(method, url);
        insert_signed_headers(request.headers_mut(), &signed)?;
        if let Some(body) = body {
            request.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            );
            *request.body_mut() = Some(body.into());
        }
        *request.timeout_mut() = Some(self.timeout);

        Ok(request)
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Get account endpoints
    pub fn account(&self) -> AccountEndpoints<'_, T> {
        AccountEndpoints::new(self)
    }

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_, T> {
        MarketEndpoints::new(self)
    }

    /// Get order endpoints
    pub fn orders(&self) -> OrderEndpoints<'_, T> {
        OrderEndpoints::new(self)
    }

    /// Get balances of all wallets
    pub async fn get_account_balances(&self) -> RestResult<AccountBalances> {
        self.account().get_balances().await
    }

    /// Stream the account history, fetching pages lazily
    pub fn account_history(
        &self,
        query: HistoryQuery,
    ) -> impl Stream<Item = RestResult<HistoryItem>> + '_ {
        self.account().history(query)
    }

    /// Get the top of the book
    pub async fn get_best_offers(&self, pair: CurrencyPair) -> RestResult<OrderBook> {
        self.market().get_best_offers(pair).await
    }

    /// Get `item_limit` levels per side, best first
    pub async fn get_best_offers_detailed(
        &self,
        pair: CurrencyPair,
        item_limit: u32,
    ) -> RestResult<OrderBook> {
        self.market().get_best_offers_detailed(pair, item_limit).await
    }

    /// Stream active orders, newest first
    pub fn active_orders(&self, item_limit: u32) -> impl Stream<Item = RestResult<Order>> + '_ {
        self.orders().active(item_limit)
    }

    /// Get an order by its exchange id
    pub async fn get_order(&self, order_id: &str) -> RestResult<Vec<Order>> {
        self.orders().get_order(order_id).await
    }

    /// Submit an order
    pub async fn submit_order(&self, request: &SubmitOrderRequest) -> RestResult<OrderSubmitted> {
        self.orders().submit_order(request).await
    }

    /// Cancel an active order
    pub async fn cancel_order(&self, order_id: &str) -> RestResult<()> {
        self.orders().cancel_order(order_id).await
    }
}

impl<T: HttpTransport> std::fmt::Debug for WalutomatRestClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalutomatRestClient")
            .field("host", &self.host)
            .field("has_credentials", &self.has_credentials())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

fn insert_signed_headers(
    headers: &mut reqwest::header::HeaderMap,
    signed: &SignedHeaders,
) -> RestResult<()> {
    for (name, value) in [
        (HEADER_API_KEY, &signed.api_key),
        (HEADER_TIMESTAMP, &signed.timestamp),
        (HEADER_SIGNATURE, &signed.signature),
    ] {
        let value = HeaderValue::from_str(value)
            .map_err(|e| RestError::InvalidParameter(format!("{}: {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(())
}

/// Decide success from the envelope alone; HTTP status is only reported
#[instrument(level = "debug", skip_all, fields(status = response.status))]
fn unwrap_envelope(response: HttpResponse, request: RequestSnapshot) -> RestResult<(u16, Value)> {
    let status = response.status;
    let envelope: ApiEnvelope =
        serde_json::from_slice(&response.body).map_err(|e| RestError::Parse {
            status,
            message: e.to_string(),
        })?;

    match (envelope.success, envelope.errors) {
        (Some(true), _) => Ok((status, envelope.result.unwrap_or(Value::Null))),
        (Some(false), Some(errors)) if !errors.is_empty() => {
            let error = ApiError::new(request, errors);
            debug!(error = %error.short(), "API returned errors");
            Err(error.into())
        }
        (Some(false), _) => Err(RestError::Protocol(format!(
            "HTTP {}: unsuccessful response without errors",
            status
        ))),
        (None, _) => Err(RestError::Protocol(format!(
            "HTTP {}: response has no success flag",
            status
        ))),
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (required by every endpoint)
    pub credentials: Option<Credentials>,
    /// API host without scheme
    pub host: String,
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub timeout: Duration,
    /// User agent header
    pub user_agent: String,
    /// Force every order submission into dry-run mode
    pub dry_run: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            host: DEFAULT_HOST.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("walutomat-rest/", env!("CARGO_PKG_VERSION")).to_string(),
            dry_run: false,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration pointing at the sandbox host
    pub fn sandbox() -> Self {
        Self::default().with_host(SANDBOX_HOST)
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set API host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable client-wide dry run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, TransportError};
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use rsa::pkcs1v15::{Signature, VerifyingKey};
    use rsa::pkcs8::DecodePrivateKey;
    use rsa::signature::Verifier;
    use sha2::Sha256;

    const TEST_KEY: &str = include_str!("../tests/fixtures/test_key.pem");

    fn client() -> WalutomatRestClient<MockTransport> {
        let config = ClientConfig::new().with_credentials(Credentials::new("API_KEY_123456", TEST_KEY));
        WalutomatRestClient::with_transport(config, MockTransport::new())
    }

    fn verify(message: &[u8], signature: &str) {
        let key = rsa::RsaPrivateKey::from_pkcs8_pem(TEST_KEY).unwrap();
        let verifying = VerifyingKey::<Sha256>::new(key.to_public_key());
        let bytes = BASE64.decode(signature).unwrap();
        let signature = Signature::try_from(bytes.as_slice()).unwrap();
        verifying.verify(message, &signature).unwrap();
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(30))
            .with_user_agent("test-agent")
            .with_dry_run(true);

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_millis(3050));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.host, "api.walutomat.pl");
        assert!(config.dry_run);
        assert_eq!(ClientConfig::sandbox().host, "api.walutomat.dev");
    }

    #[tokio::test]
    async fn test_auth_required_error() {
        let client = WalutomatRestClient::with_transport(ClientConfig::new(), MockTransport::new());
        let result = client.execute(Method::GET, "/api/v2.0.0/account/balances", &[], None).await;
        assert!(matches!(result, Err(RestError::AuthRequired)));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_request_is_signed_with_query() {
        let client = client();
        client.transport().push_result(serde_json::json!([]));

        client
            .execute(
                Method::GET,
                "/api/v2.0.0/market_fx/orders",
                &[("orderId", "abc-1".to_string())],
                None,
            )
            .await
            .unwrap();

        let request = client.transport().last_request().unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(
            request.url.as_str(),
            "https://api.walutomat.pl/api/v2.0.0/market_fx/orders?orderId=abc-1"
        );
        assert_eq!(request.header("X-API-Key"), Some("API_KEY_123456"));
        assert!(request.body.is_none());

        let timestamp = request.header("X-API-Timestamp").unwrap();
        let message = format!("{}/api/v2.0.0/market_fx/orders?orderId=abc-1", timestamp);
        verify(message.as_bytes(), request.header("X-API-Signature").unwrap());
    }

    #[tokio::test]
    async fn test_post_request_signs_body() {
        let client = client();
        client.transport().push_result(serde_json::json!({"orderId": "o-1"}));

        let form = [("orderId", "o-1".to_string())];
        client
            .execute(Method::POST, "/api/v2.0.0/market_fx/orders/close", &[], Some(&form))
            .await
            .unwrap();

        let request = client.transport().last_request().unwrap();
        assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(request.body.as_deref(), Some(&b"orderId=o-1"[..]));

        let timestamp = request.header("X-API-Timestamp").unwrap();
        let message = format!("{}/api/v2.0.0/market_fx/orders/closeorderId=o-1", timestamp);
        verify(message.as_bytes(), request.header("X-API-Signature").unwrap());
    }

    #[tokio::test]
    async fn test_success_without_result_is_null() {
        let client = client();
        client.transport().push_response(200, r#"{"success":true}"#);

        let result = client.execute(Method::GET, "/p", &[], None).await.unwrap();
        assert!(result.is_null());
    }

    #[tokio::test]
    async fn test_api_error_envelope() {
        let client = client();
        client
            .transport()
            .push_api_errors(&[("INSUFFICIENT_FUNDS", "Not enough funds")]);

        let form = [("volume", "1".to_string())];
        let err = client
            .execute(Method::POST, "/api/v2.0.0/market_fx/orders", &[], Some(&form))
            .await
            .unwrap_err();

        assert_eq!(err.api_error_keys(), vec!["INSUFFICIENT_FUNDS"]);
        let api = err.api_error().unwrap();
        assert_eq!(api.request.method, "POST");
        assert_eq!(api.request.body.as_deref(), Some("volume=1"));
        assert!(api
            .request
            .headers
            .contains(&("x-api-signature".to_string(), "[REDACTED]".to_string())));
    }

    #[tokio::test]
    async fn test_envelope_is_authoritative_over_status() {
        let client = client();
        client
            .transport()
            .push_response(500, r#"{"success":true,"result":{"ok":1}}"#);

        let result = client.execute(Method::GET, "/p", &[], None).await.unwrap();
        assert_eq!(result["ok"], 1);
    }

    #[tokio::test]
    async fn test_malformed_envelopes() {
        let client = client();
        client.transport().push_response(200, r#"{"result":[]}"#);
        client.transport().push_response(400, r#"{"success":false,"errors":[]}"#);
        client.transport().push_response(502, "<html>Bad Gateway</html>");

        let missing_flag = client.execute(Method::GET, "/p", &[], None).await;
        assert!(matches!(missing_flag, Err(RestError::Protocol(_))));

        let no_errors = client.execute(Method::GET, "/p", &[], None).await;
        assert!(matches!(no_errors, Err(RestError::Protocol(_))));

        let not_json = client.execute(Method::GET, "/p", &[], None).await;
        assert!(matches!(not_json, Err(RestError::Parse { status: 502, .. })));
    }

    #[tokio::test]
    async fn test_result_shape_mismatch_is_parse_error() {
        let client = client();
        client.transport().push_result(serde_json::json!({"not": "a list"}));

        let result: RestResult<Vec<Order>> = client.execute_as(Method::GET, "/p", &[], None).await;
        assert!(matches!(result, Err(RestError::Parse { status: 200, .. })));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = client();
        client.transport().push_error(TransportError::Timeout);

        let err = client.execute(Method::GET, "/p", &[], None).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_sandbox_host() {
        let config = ClientConfig::sandbox().with_credentials(Credentials::new("k", TEST_KEY));
        let client = WalutomatRestClient::with_transport(config, MockTransport::new());
        client.transport().push_result(serde_json::json!([]));

        client.execute(Method::GET, "/api/v2.0.0/account/balances", &[], None).await.unwrap();

        let request = client.transport().last_request().unwrap();
        assert_eq!(request.url.host_str(), Some("api.walutomat.dev"));
    }
}
