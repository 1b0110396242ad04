//! Per-request options: everything except the method.

use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON with `content-type: application/json`.
    Json(Value),
    /// Sent as is.
    Text(String),
}

/// Credentials attached as an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Basic {
        username: String,
        password: Option<String>,
    },
}

/// Options for a single request.
///
/// Invalid header names or values are not rejected here; they surface as a
/// `fetch failed` transport failure when the request is sent.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
    abort: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer(token.into()));
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.credentials = Some(Credentials::Basic {
            username: username.into(),
            password,
        });
        self
    }

    /// Deadline for this request only; there is none by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Cancel the request (and its body read) when `token` is cancelled.
    pub fn abort_signal(mut self, token: CancellationToken) -> Self {
        self.abort = Some(token);
        self
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub fn abort_token(&self) -> Option<&CancellationToken> {
        self.abort.as_ref()
    }

    pub(crate) fn apply(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if !self.query.is_empty() {
            request = request.query(&self.query);
        }

        request = match &self.credentials {
            Some(Credentials::Bearer(token)) => request.bearer_auth(token),
            Some(Credentials::Basic { username, password }) => {
                request.basic_auth(username, password.as_ref())
            }
            None => request,
        };

        request = match &self.body {
            Some(RequestBody::Json(value)) => request.json(value),
            Some(RequestBody::Text(text)) => request.body(text.clone()),
            None => request,
        };

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        request
    }
}
