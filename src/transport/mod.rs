//! Adapter over the platform HTTP facility (`reqwest`).
//!
//! This is the only place that turns low-level errors into [`Failure`] values, and
//! so the only place that decides the wording the classifier's message heuristics
//! read.

mod http;

pub use http::HttpTransport;

use crate::failure::{Failure, ParseFailure, TransportFailure};

impl From<reqwest::Error> for Failure {
    fn from(err: reqwest::Error) -> Self {
        let detail = error_chain(&err);
        if err.is_timeout() {
            TransportFailure::request(format!("network timeout: {}", detail)).into()
        } else if err.is_connect() || err.is_body() {
            TransportFailure::request(format!("network error: {}", detail)).into()
        } else if err.is_decode() {
            ParseFailure::new(format!("syntax error: {}", detail)).into()
        } else {
            TransportFailure::request(format!("fetch failed: {}", detail)).into()
        }
    }
}

/// Render an error with its whole source chain, `outer: inner: root`.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = inner.source();
    }
    out
}
