//! Failure classification and callback dispatch.
//!
//! [`handle_error`] inspects a [`Failure`] against a [`CallbackConfig`] and invokes
//! every matching callback, in this order:
//!
//! 1. **client**: subtype callbacks (`fetch`/`network`, `abort`, `security`, `syntax`),
//!    then `client.all` once if the failure is any client/transport failure.
//! 2. **status**: the exact code, else `status.other`; then `status.all`.
//! 3. **body**: one callback per configured field present on the failure.
//! 4. **other**: only if nothing above fired.
//! 5. **all**: always.
//!
//! Axes are independent: one failure may fire callbacks on several of them.
//! Classification is synchronous and performs no I/O. Panics raised by a callback
//! are not caught.

mod client;
mod config;

pub use client::{client_signals, ClientSignals};
pub use config::{
    BodyCallbacks, Callback, CallbackConfig, ClientCallbacks, ClientKind, FieldCallback,
    StatusCallbacks,
};

use crate::failure::Failure;
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, trace};

use config::FieldCallbacks;

/// Classify `failure` and invoke the matching callbacks from `config`.
pub fn handle_error(failure: &Failure, config: &CallbackConfig<'_>) {
    let mut dispatch = Dispatch { failure, fired: 0 };

    if let Some(client) = &config.client {
        dispatch.client_axis(client);
    }

    if let (Some(status), Some(callbacks)) = (failure.status(), &config.status) {
        dispatch.status_axis(status, callbacks);
    }

    if let Some(body) = &config.body {
        dispatch.body_axis(body);
    }

    if dispatch.fired == 0 {
        if let Some(other) = &config.other {
            dispatch.fire("other", "other", other);
        }
    }

    if let Some(all) = &config.all {
        dispatch.fire("all", "all", all);
    }

    debug!(
        failure_kind = failure.kind(),
        http_status = ?failure.status(),
        fired = dispatch.fired,
        "failure classified"
    );
}

struct Dispatch<'f> {
    failure: &'f Failure,
    fired: usize,
}

impl Dispatch<'_> {
    fn fire(&mut self, axis: &'static str, key: &str, callback: &Callback<'_>) {
        trace!(axis, key, "invoking error callback");
        self.fired += 1;
        callback(self.failure);
    }

    fn client_axis(&mut self, callbacks: &ClientCallbacks<'_>) {
        let signals = client_signals(self.failure);

        for kind in signals.kinds() {
            if let Some(callback) = callbacks.kinds.get(&kind) {
                self.fire("client", kind.as_str(), callback);
            }
        }

        if signals.is_client_failure() {
            if let Some(all) = &callbacks.all {
                self.fire("client", "all", all);
            }
        }
    }

    fn status_axis(&mut self, status: u16, callbacks: &StatusCallbacks<'_>) {
        if let Some(exact) = callbacks.codes.get(&status) {
            self.fire("status", &status.to_string(), exact);
        } else if let Some(other) = &callbacks.other {
            self.fire("status", "other", other);
        }

        if let Some(all) = &callbacks.all {
            self.fire("status", "all", all);
        }
    }

    fn body_axis(&mut self, callbacks: &BodyCallbacks<'_>) {
        let failure = self.failure;
        for (name, value) in failure.fields() {
            if let Some(field) = callbacks.fields.get(name) {
                self.field(name, value, field);
            }
        }
    }

    fn field(&mut self, name: &str, value: &Value, callbacks: &FieldCallbacks<'_>) {
        if let Some(any) = &callbacks.any {
            trace!(axis = "body", key = name, "invoking error callback");
            self.fired += 1;
            any(self.failure, value);
        }

        if let Some(matched) = value_key(value).and_then(|key| callbacks.values.get(&*key)) {
            self.fire("body", name, matched);
        }
    }
}

/// Text used to match a field value against `on_value` keys.
fn value_key(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}
