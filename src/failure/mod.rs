//! Failure values produced by the request executor and consumed by the classifier.
//!
//! A [`Failure`] is whatever a request "threw": a transport exception, a body that
//! could not be parsed, a decoded JSON error body merged with its HTTP status, a raw
//! error response, or any other opaque value supplied by the caller.
//!
//! | Variant | Status axis | Field axis | Client axis |
//! |---------|-------------|------------|-------------|
//! | [`Failure::Transport`] | - | - | yes |
//! | [`Failure::Parse`] | - | - | yes (`syntax`) |
//! | [`Failure::Structured`] | when `status` is set | yes | - |
//! | [`Failure::Response`] | yes | - | - |
//! | [`Failure::Opaque`] | - | - | - |

use reqwest::header::HeaderMap;
use serde_json::{json, Map, Value};
use std::fmt;

/// Name of the field that carries the HTTP status in a structured failure.
pub const STATUS_FIELD: &str = "status";

/// Where a transport failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportOrigin {
    /// Connectivity, DNS, timeout or request-construction failure.
    Request,
    /// The request was cancelled through its abort token.
    Aborted,
    /// The request was refused by the client's security policy.
    Security,
}

impl TransportOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Aborted => "aborted",
            Self::Security => "security",
        }
    }
}

/// A failure raised before or outside a valid HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub origin: TransportOrigin,
    pub message: String,
}

impl TransportFailure {
    pub fn new(origin: TransportOrigin, message: impl Into<String>) -> Self {
        Self {
            origin,
            message: message.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::new(TransportOrigin::Request, message)
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(TransportOrigin::Aborted, message)
    }

    pub fn security(message: impl Into<String>) -> Self {
        Self::new(TransportOrigin::Security, message)
    }
}

/// A response body that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseFailure {
    pub message: String,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ParseFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("syntax error: {}", err))
    }
}

/// A decoded JSON error body merged with the HTTP status code.
///
/// `fields` keeps the body's field order. A numeric `status` is held in
/// [`StructuredFailure::status`] instead of the map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructuredFailure {
    pub status: Option<u16>,
    pub fields: Map<String, Value>,
}

impl StructuredFailure {
    pub fn new(status: Option<u16>) -> Self {
        Self {
            status,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Merge an error body with the response status; the response status wins
    /// over any `status` the body carried.
    pub fn from_body(status: u16, mut body: Map<String, Value>) -> Self {
        body.shift_remove(STATUS_FIELD);
        Self {
            status: Some(status),
            fields: body,
        }
    }

    /// Build from an arbitrary JSON object, lifting a numeric `status` out of it.
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let status = object.get(STATUS_FIELD).and_then(status_from_value);
        if status.is_some() {
            object.shift_remove(STATUS_FIELD);
        }
        Self {
            status,
            fields: object,
        }
    }

    /// Fields other than the status field, in body order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(name, _)| name.as_str() != STATUS_FIELD)
            .map(|(name, value)| (name.as_str(), value))
    }

    /// The merged `{status, ...fields}` view.
    pub fn to_value(&self) -> Value {
        let Some(status) = self.status else {
            return Value::Object(self.fields.clone());
        };
        let mut merged = Map::with_capacity(self.fields.len() + 1);
        merged.insert(STATUS_FIELD.to_string(), Value::from(status));
        merged.extend(self.fields().map(|(k, v)| (k.to_string(), v.clone())));
        Value::Object(merged)
    }
}

fn status_from_value(value: &Value) -> Option<u16> {
    value.as_u64().and_then(|n| u16::try_from(n).ok())
}

/// A non-2xx response whose body was not a JSON object.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: u16,
    pub url: String,
    pub headers: HeaderMap,
    pub text: String,
}

/// Everything a failed request can produce.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Failure {
    #[error("transport failure ({}): {}", .0.origin.as_str(), .0.message)]
    Transport(TransportFailure),

    #[error("parse failure: {0}")]
    Parse(ParseFailure),

    #[error("server error{}", format_structured(.0))]
    Structured(StructuredFailure),

    #[error("HTTP {} from {}", .0.status, .0.url)]
    Response(ErrorResponse),

    #[error("unclassified failure: {0}")]
    Opaque(Value),
}

fn format_structured(failure: &StructuredFailure) -> String {
    let mut out = String::new();
    if let Some(status) = failure.status {
        out.push_str(&format!(" {}", status));
    }
    if !failure.fields.is_empty() {
        out.push_str(&format!(": {}", Value::Object(failure.fields.clone())));
    }
    out
}

impl Failure {
    /// Short lowercase tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Parse(_) => "parse",
            Self::Structured(_) => "structured",
            Self::Response(_) => "response",
            Self::Opaque(_) => "opaque",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Structured(s) => s.status,
            Self::Response(r) => Some(r.status),
            _ => None,
        }
    }

    /// Exception message, for the variants that carry one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Transport(t) => Some(&t.message),
            Self::Parse(p) => Some(&p.message),
            _ => None,
        }
    }

    /// Enumerable fields other than `status`. Empty unless structured.
    pub fn fields(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        match self {
            Self::Structured(s) => Box::new(s.fields()),
            _ => Box::new(std::iter::empty()),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        if name == STATUS_FIELD {
            return None;
        }
        match self {
            Self::Structured(s) => s.fields.get(name),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// JSON view of the failure, as a callback or log sink would see it.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Transport(t) => json!({
                "kind": self.kind(),
                "origin": t.origin.as_str(),
                "message": t.message,
            }),
            Self::Parse(p) => json!({
                "kind": self.kind(),
                "message": p.message,
            }),
            Self::Structured(s) => s.to_value(),
            Self::Response(r) => json!({
                "status": r.status,
                "url": r.url,
                "text": r.text,
            }),
            Self::Opaque(v) => v.clone(),
        }
    }
}

impl From<Value> for Failure {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) => Self::Structured(StructuredFailure::from_object(object)),
            other => Self::Opaque(other),
        }
    }
}

impl From<&str> for Failure {
    fn from(value: &str) -> Self {
        Self::Opaque(Value::String(value.to_string()))
    }
}

impl From<String> for Failure {
    fn from(value: String) -> Self {
        Self::Opaque(Value::String(value))
    }
}

impl From<TransportFailure> for Failure {
    fn from(value: TransportFailure) -> Self {
        Self::Transport(value)
    }
}

impl From<ParseFailure> for Failure {
    fn from(value: ParseFailure) -> Self {
        Self::Parse(value)
    }
}

impl From<StructuredFailure> for Failure {
    fn from(value: StructuredFailure) -> Self {
        Self::Structured(value)
    }
}

impl From<ErrorResponse> for Failure {
    fn from(value: ErrorResponse) -> Self {
        Self::Response(value)
    }
}

impl fmt::Display for TransportOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
