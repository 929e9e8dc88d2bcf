//! HTTP client abstraction for probe requests.
//!
//! This module defines the `HttpClient` trait so the actions can be exercised against a
//! recording mock as well as a real server.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

/// A single request issued by an action.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// A GET with no body and no extra headers.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// A POST declaring its content type and exact byte length.
    pub fn post(url: Url, content_type: &'static str, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));

        Self {
            method: Method::POST,
            url,
            headers,
            body: Some(body),
        }
    }
}

/// Response to an [`HttpRequest`].
///
/// The body is read eagerly by the client; a failure while reading it is kept alongside the
/// status so callers can decide whether it matters.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase as sent by the server, else the canonical one for the code
    pub status_text: String,
    /// Raw `Content-Type` header, if the server sent one
    pub content_type: Option<String>,
    body: Result<Bytes>,
}

impl HttpResponse {
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            content_type: None,
            body: Ok(Bytes::new()),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Ok(body.into());
        self
    }

    /// Mark the body as unreadable, e.g. the connection dropped mid-transfer.
    pub fn with_body_error(mut self, error: Error) -> Self {
        self.body = Err(error);
        self
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(self) -> Result<String> {
        self.body.map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn bytes(self) -> Result<Bytes> {
        self.body
    }
}

/// Trait for executing HTTP requests.
///
/// # Example
/// ```ignore
/// let client = ReqwestHttpClient::new();
/// let response = client.execute(HttpRequest::get(url)).await?;
/// println!("Status: {} {}", response.status, response.status_text);
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and read its body.
    ///
    /// # Errors
    /// Returns an error if the request could not be dispatched or no response arrived
    /// (connection refused, DNS failure, TLS failure). A received response is never an
    /// error, whatever its status.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production HTTP client using reqwest.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(
            body_len = request.body.as_ref().map(Bytes::len).unwrap_or(0),
            "Executing HTTP request"
        );

        let mut req = self
            .client
            .request(request.method, request.url.clone())
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!(url = %request.url, error = %e, "HTTP request failed");
            e
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        // hyper keeps the phrase from the status line only when it differs from the canonical one
        let status_text = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

        let mut probe_response = HttpResponse::new(status.as_u16(), status_text);
        probe_response.content_type = content_type;

        let probe_response = match response.bytes().await {
            Ok(body) => {
                tracing::info!(status = status.as_u16(), response_len = body.len(), "HTTP request completed");
                probe_response.with_body(body)
            }
            Err(e) => {
                tracing::debug!(status = status.as_u16(), error = %e, "Failed to read response body");
                probe_response.with_body_error(Error::Transport(e))
            }
        };

        Ok(probe_response)
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Mock HTTP client for testing.
///
/// Returns predetermined responses without touching the network and records every call.
///
/// # Example
/// ```ignore
/// let mock = MockHttpClient::new();
/// mock.add_response(
///     "GET /status",
///     Ok(HttpResponse::new(200, "OK").with_content_type("text/plain").with_body("up")),
/// );
/// ```
#[derive(Clone)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, Vec<Result<HttpResponse>>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// Record of a call made to the mock HTTP client.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl MockCall {
    /// Header value as a string, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a predetermined response for a method and URL path.
    ///
    /// The key is formatted as "{method} {path}". Responses queued under the same key are
    /// returned in FIFO order.
    pub fn add_response(&self, key: &str, response: Result<HttpResponse>) {
        self.responses
            .lock()
            .entry(key.to_string())
            .or_default()
            .push(response);
    }

    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let key = format!("{} {}", request.method, request.url.path());

        self.calls.lock().push(MockCall {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body: request.body,
        });

        let mut responses = self.responses.lock();
        if let Some(queue) = responses.get_mut(&key) {
            if !queue.is_empty() {
                return queue.remove(0);
            }
        }

        Err(Error::Other(anyhow::anyhow!("No mock response configured for {key}")))
    }
}
