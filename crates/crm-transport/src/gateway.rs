//! HTTP gateway for the CRM API.
//!
//! Every outbound call flows through [`RequestGateway::send`]. On the way
//! out the gateway attaches a correlation id and, when a token is
//! available, a bearer credential; caller-supplied headers are never
//! overwritten. On the way back it classifies failures: a 401 outside the
//! login endpoint publishes `Expired` on the session channel, a 5xx is
//! logged with path and status. In every failure case the original error is
//! returned unchanged; the gateway observes and signals but never recovers
//! on behalf of callers.
//!
//! The wire itself sits behind [`HttpBackend`], with [`UreqBackend`] as the
//! production implementation (one `ureq::Agent`, fixed connect/response
//! timeouts configured once). Tests substitute an in-memory backend.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crm_client_types::EntityKind;

use crate::correlation::{correlation_id, REQUEST_ID_HEADER};
use crate::session::{SessionEvent, SessionEventChannel};

/// The one path whose 401s mean "bad login", not "session died".
pub const LOGIN_PATH: &str = "/auth/login";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const RESPONSE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Caller-facing request descriptor.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }
}

/// A request after tagging and auth injection, ready for the wire.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Failure surfaced by the gateway. `Status` carries the HTTP status for
/// caller-side classification; `Transport` covers everything with no
/// response (connect failure, timeout, malformed body).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP {status} on {path}")]
    Status {
        status: u16,
        path: String,
        body: Option<Value>,
    },
    #[error("transport failure on {path}: {message}")]
    Transport { path: String, message: String },
}

impl GatewayError {
    /// HTTP status of the failure, if a response was received at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Transport { .. } => None,
        }
    }
}

/// Source of the current bearer token. Read-only from the gateway's
/// perspective; `None` (or a provider that cannot produce a token) degrades
/// to sending without an auth header, never to aborting the request.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Token provider backed by a fixed optional token.
pub struct StaticTokenProvider(Option<String>);

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// The seam between the gateway and the wire.
pub trait HttpBackend: Send + Sync {
    fn execute(&self, request: &PreparedRequest) -> Result<Value, GatewayError>;
}

/// Production backend: one shared `ureq::Agent` with fixed timeouts.
pub struct UreqBackend {
    agent: ureq::Agent,
}

impl UreqBackend {
    pub fn new() -> Self {
        use std::time::Duration;
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(Duration::from_secs(RESPONSE_TIMEOUT_SECS))
                .build(),
        }
    }
}

impl Default for UreqBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpBackend for UreqBackend {
    fn execute(&self, request: &PreparedRequest) -> Result<Value, GatewayError> {
        let mut call = self.agent.request(request.method.as_str(), &request.url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let result = match &request.body {
            Some(body) => call.send_json(body.clone()),
            None => call.call(),
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response
                    .into_string()
                    .ok()
                    .and_then(|text| serde_json::from_str(&text).ok());
                return Err(GatewayError::Status {
                    status,
                    path: request.path.clone(),
                    body,
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(GatewayError::Transport {
                    path: request.path.clone(),
                    message: transport.to_string(),
                });
            }
        };

        let text = response.into_string().map_err(|e| GatewayError::Transport {
            path: request.path.clone(),
            message: format!("failed to read response body: {e}"),
        })?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| GatewayError::Transport {
            path: request.path.clone(),
            message: format!("failed to parse response body: {e}"),
        })
    }
}

/// Gateway owning the HTTP backend, base URL, token source, and session
/// channel. Shared across all loaders for the life of the process.
pub struct RequestGateway {
    backend: Box<dyn HttpBackend>,
    base_url: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
    session: SessionEventChannel,
}

impl RequestGateway {
    /// Create a gateway over the production [`UreqBackend`].
    pub fn new(base_url: impl Into<String>, session: SessionEventChannel) -> Self {
        Self::with_backend(Box::new(UreqBackend::new()), base_url, session)
    }

    /// Create a gateway over a custom backend.
    pub fn with_backend(
        backend: Box<dyn HttpBackend>,
        base_url: impl Into<String>,
        session: SessionEventChannel,
    ) -> Self {
        Self {
            backend,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_provider: None,
            session,
        }
    }

    /// Builder: install a token source for bearer auth injection.
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one call: tag, authenticate, forward, classify.
    ///
    /// Failures are returned unchanged after classification; the gateway
    /// never swallows or rewrites an error.
    pub fn send(&self, request: ApiRequest) -> Result<Value, GatewayError> {
        let prepared = self.prepare(request);
        debug!(
            method = prepared.method.as_str(),
            path = %prepared.path,
            "outbound request"
        );

        match self.backend.execute(&prepared) {
            Ok(body) => Ok(body),
            Err(err) => {
                self.classify(&prepared.path, &err);
                Err(err)
            }
        }
    }

    /// Query one page of a list endpoint:
    /// `GET <resource>?q=<query>&cursor=<opaque>&limit=<n>`.
    ///
    /// The cursor is echoed verbatim when present and omitted entirely when
    /// absent.
    pub fn fetch_list(
        &self,
        kind: EntityKind,
        query: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Value, GatewayError> {
        let mut request = ApiRequest::get(kind.resource_path()).query("q", query);
        if let Some(cursor) = cursor {
            request = request.query("cursor", cursor);
        }
        self.send(request.query("limit", limit.to_string()))
    }

    fn prepare(&self, request: ApiRequest) -> PreparedRequest {
        let mut headers = Vec::new();
        if !request.has_header(REQUEST_ID_HEADER) {
            headers.push((REQUEST_ID_HEADER.to_string(), correlation_id()));
        }
        if !request.has_header("Authorization") {
            if let Some(token) = self.token_provider.as_ref().and_then(|p| p.token()) {
                headers.push(("Authorization".to_string(), format!("Bearer {token}")));
            }
        }
        headers.extend(request.headers);

        PreparedRequest {
            method: request.method,
            url: build_url(&self.base_url, &request.path, &request.query),
            path: request.path,
            headers,
            body: request.body,
        }
    }

    fn classify(&self, path: &str, err: &GatewayError) {
        if let GatewayError::Status { status, .. } = err {
            if *status == 401 && path != LOGIN_PATH {
                self.session.publish(SessionEvent::Expired);
            } else if *status >= 500 {
                warn!(path, status, "server failure");
            }
        }
    }
}

fn build_url(base_url: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = format!("{base_url}{path}");
    for (i, (key, value)) in query.iter().enumerate() {
        let sep = if i == 0 { '?' } else { '&' };
        url.push(sep);
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}
