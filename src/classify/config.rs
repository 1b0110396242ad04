//! Declarative callback configuration for [`handle_error`](super::handle_error).
//!
//! Every axis is optional; an absent axis is skipped. Callbacks borrow from the
//! call site (`'a`), so a configuration is normally built right where the failure
//! is caught and dropped right after classification.

use crate::failure::Failure;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Callback receiving the failure.
pub type Callback<'a> = Box<dyn Fn(&Failure) + 'a>;

/// Callback receiving the failure and the matched field's value.
pub type FieldCallback<'a> = Box<dyn Fn(&Failure, &Value) + 'a>;

/// Client/transport failure subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    /// The request could not be issued ("failed" in the message).
    Fetch,
    /// Connectivity failure ("network" in the message).
    Network,
    /// The request was aborted.
    Abort,
    /// The request was blocked by security policy.
    Security,
    /// The response body could not be parsed.
    Syntax,
}

impl ClientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Network => "network",
            Self::Abort => "abort",
            Self::Security => "security",
            Self::Syntax => "syntax",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status axis: exact codes, plus `other` and `all`.
#[derive(Default)]
pub struct StatusCallbacks<'a> {
    pub(crate) codes: HashMap<u16, Callback<'a>>,
    pub(crate) other: Option<Callback<'a>>,
    pub(crate) all: Option<Callback<'a>>,
}

impl<'a> StatusCallbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire when the failure's status equals `code`.
    pub fn on(mut self, code: u16, callback: impl Fn(&Failure) + 'a) -> Self {
        self.codes.insert(code, Box::new(callback));
        self
    }

    /// Fire when a status is present but no exact code matched.
    pub fn other(mut self, callback: impl Fn(&Failure) + 'a) -> Self {
        self.other = Some(Box::new(callback));
        self
    }

    /// Fire whenever a status is present.
    pub fn all(mut self, callback: impl Fn(&Failure) + 'a) -> Self {
        self.all = Some(Box::new(callback));
        self
    }
}

#[derive(Default)]
pub(crate) struct FieldCallbacks<'a> {
    pub(crate) any: Option<FieldCallback<'a>>,
    pub(crate) values: HashMap<String, Callback<'a>>,
}

/// Field axis: callbacks keyed by body field name.
#[derive(Default)]
pub struct BodyCallbacks<'a> {
    pub(crate) fields: HashMap<String, FieldCallbacks<'a>>,
}

impl<'a> BodyCallbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire with `(failure, value)` whenever `field` is present on the failure.
    pub fn on(mut self, field: impl Into<String>, callback: impl Fn(&Failure, &Value) + 'a) -> Self {
        self.fields.entry(field.into()).or_default().any = Some(Box::new(callback));
        self
    }

    /// Fire when `field` is present and its value renders as `value`.
    ///
    /// Strings compare by content; numbers and booleans by their JSON text.
    pub fn on_value(
        mut self,
        field: impl Into<String>,
        value: impl Into<String>,
        callback: impl Fn(&Failure) + 'a,
    ) -> Self {
        self.fields
            .entry(field.into())
            .or_default()
            .values
            .insert(value.into(), Box::new(callback));
        self
    }
}

/// Client axis: callbacks keyed by [`ClientKind`], plus `all`.
#[derive(Default)]
pub struct ClientCallbacks<'a> {
    pub(crate) kinds: HashMap<ClientKind, Callback<'a>>,
    pub(crate) all: Option<Callback<'a>>,
}

impl<'a> ClientCallbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, kind: ClientKind, callback: impl Fn(&Failure) + 'a) -> Self {
        self.kinds.insert(kind, Box::new(callback));
        self
    }

    /// Fire once for any client/transport failure.
    pub fn all(mut self, callback: impl Fn(&Failure) + 'a) -> Self {
        self.all = Some(Box::new(callback));
        self
    }
}

/// The full matcher handed to [`handle_error`](super::handle_error).
///
/// ```rust
/// use fetchy::{handle_error, CallbackConfig, Failure, StatusCallbacks};
/// use serde_json::json;
/// use std::cell::Cell;
///
/// let unauthorized = Cell::new(0);
/// let config = CallbackConfig::new()
///     .status(StatusCallbacks::new().on(401, |_| unauthorized.set(unauthorized.get() + 1)));
///
/// handle_error(&Failure::from(json!({"status": 401})), &config);
/// assert_eq!(unauthorized.get(), 1);
/// ```
#[derive(Default)]
pub struct CallbackConfig<'a> {
    pub(crate) status: Option<StatusCallbacks<'a>>,
    pub(crate) body: Option<BodyCallbacks<'a>>,
    pub(crate) client: Option<ClientCallbacks<'a>>,
    pub(crate) other: Option<Callback<'a>>,
    pub(crate) all: Option<Callback<'a>>,
}

impl<'a> CallbackConfig<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, callbacks: StatusCallbacks<'a>) -> Self {
        self.status = Some(callbacks);
        self
    }

    pub fn body(mut self, callbacks: BodyCallbacks<'a>) -> Self {
        self.body = Some(callbacks);
        self
    }

    pub fn client(mut self, callbacks: ClientCallbacks<'a>) -> Self {
        self.client = Some(callbacks);
        self
    }

    /// Fallback: fires only when no axis-specific callback fired.
    pub fn other(mut self, callback: impl Fn(&Failure) + 'a) -> Self {
        self.other = Some(Box::new(callback));
        self
    }

    /// Catch-all: fires once per classification, after everything else.
    pub fn all(mut self, callback: impl Fn(&Failure) + 'a) -> Self {
        self.all = Some(Box::new(callback));
        self
    }

    /// Shorthand for adding one exact-code callback to the status axis.
    pub fn on_status(mut self, code: u16, callback: impl Fn(&Failure) + 'a) -> Self {
        self.status
            .get_or_insert_with(StatusCallbacks::new)
            .codes
            .insert(code, Box::new(callback));
        self
    }

    /// Shorthand for adding one field callback to the body axis.
    pub fn on_field(
        mut self,
        field: impl Into<String>,
        callback: impl Fn(&Failure, &Value) + 'a,
    ) -> Self {
        self.body
            .get_or_insert_with(BodyCallbacks::new)
            .fields
            .entry(field.into())
            .or_default()
            .any = Some(Box::new(callback));
        self
    }

    /// Shorthand for adding one subtype callback to the client axis.
    pub fn on_client(mut self, kind: ClientKind, callback: impl Fn(&Failure) + 'a) -> Self {
        self.client
            .get_or_insert_with(ClientCallbacks::new)
            .kinds
            .insert(kind, Box::new(callback));
        self
    }
}
