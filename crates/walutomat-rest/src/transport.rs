//! HTTP transport abstraction
//!
//! The client prepares and signs a complete [`reqwest::Request`] and hands it
//! to a transport. This keeps signing independent of how bytes reach the
//! exchange and enables unit testing of the client without network calls.

use async_trait::async_trait;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// Connect or read timeout elapsed
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other HTTP-level failure
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// Raw HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response with the given status and body
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Trait for HTTP transport abstraction
///
/// This trait enables unit testing of the REST client by allowing
/// mock implementations to be injected instead of real HTTP connections.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a fully prepared request and return the raw response
    async fn send(&self, request: reqwest::Request) -> Result<HttpResponse, TransportError>;
}

/// Timeouts and identity for the production transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// TCP/TLS connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub timeout: Duration,
    /// User agent header
    pub user_agent: String,
}

/// Real HTTP transport using reqwest
///
/// The connection pool is created on the first request and reused for the
/// lifetime of the transport.
pub struct ReqwestTransport {
    config: TransportConfig,
    client: OnceLock<reqwest::Client>,
}

impl ReqwestTransport {
    /// Create a new transport; nothing is allocated until the first request
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&reqwest::Client, TransportError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(self.config.connect_timeout)
            .timeout(self.config.timeout)
            .user_agent(self.config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        debug!("Created HTTP client");

        Ok(self.client.get_or_init(|| client))
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .field("initialized", &self.client.get().is_some())
            .finish()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.url().path()))]
    async fn send(&self, request: reqwest::Request) -> Result<HttpResponse, TransportError> {
        let response = self.client()?.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(status, len = body.len(), "Received response");

        Ok(HttpResponse { status, body })
    }
}

/// A request captured by [`MockTransport`]
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: reqwest::Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordedRequest {
    /// First value of a header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded query parameters
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url.query_pairs().into_owned().collect()
    }

    /// Decoded form body parameters
    pub fn form(&self) -> Vec<(String, String)> {
        self.body
            .as_deref()
            .and_then(|b| serde_urlencoded::from_bytes(b).ok())
            .unwrap_or_default()
    }

    /// First value of a query or form parameter
    pub fn param(&self, name: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .chain(self.form())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}

/// Mock transport for testing
///
/// Replays queued responses in order and records every request sent.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct MockTransport {
    responses: parking_lot::Mutex<std::collections::VecDeque<Result<HttpResponse, TransportError>>>,
    requests: parking_lot::Mutex<Vec<RecordedRequest>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Create a new mock transport with no queued responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .push_back(Ok(HttpResponse::new(status, body.into())));
    }

    /// Queue a successful envelope wrapping `result`
    pub fn push_result(&self, result: serde_json::Value) {
        let body = serde_json::json!({ "success": true, "result": result });
        self.push_response(200, body.to_string());
    }

    /// Queue a failed envelope with `(key, description)` errors
    pub fn push_api_errors(&self, errors: &[(&str, &str)]) {
        let errors: Vec<_> = errors
            .iter()
            .map(|(key, description)| serde_json::json!({ "key": key, "description": description }))
            .collect();
        let body = serde_json::json!({ "success": false, "errors": errors });
        self.push_response(400, body.to_string());
    }

    /// Queue a transport failure
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// All requests sent so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of responses not consumed yet
    pub fn pending_responses(&self) -> usize {
        self.responses.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: reqwest::Request) -> Result<HttpResponse, TransportError> {
        let recorded = RecordedRequest {
            method: request.method().to_string(),
            url: request.url().clone(),
            headers: request
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
                .collect(),
            body: request
                .body()
                .and_then(reqwest::Body::as_bytes)
                .map(<[u8]>::to_vec),
        };
        self.requests.lock().push(recorded);

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Http("no mock response queued".into())))
    }
}
