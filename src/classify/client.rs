//! Client/transport subtype inference.
//!
//! The platform gives no structured code for these failures, so the subtype is
//! read off the exception message. All of that lives here; the dispatcher only
//! sees [`ClientSignals`].

use super::config::ClientKind;
use crate::failure::{Failure, TransportOrigin};

/// What the client axis learned about a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientSignals {
    /// The failure is a request-level transport exception.
    pub transport: bool,
    /// `Fetch` or `Network`; network wins when both substrings occur.
    pub request: Option<ClientKind>,
    pub aborted: bool,
    pub security: bool,
    pub syntax: bool,
}

impl ClientSignals {
    /// Matched subtypes in dispatch order.
    pub fn kinds(&self) -> impl Iterator<Item = ClientKind> {
        [
            self.request,
            self.aborted.then_some(ClientKind::Abort),
            self.security.then_some(ClientKind::Security),
            self.syntax.then_some(ClientKind::Syntax),
        ]
        .into_iter()
        .flatten()
    }

    /// Whether `client.all` applies.
    pub fn is_client_failure(&self) -> bool {
        self.transport || self.aborted || self.security || self.syntax
    }
}

/// Infer the client subtypes of `failure`.
pub fn client_signals(failure: &Failure) -> ClientSignals {
    let mut signals = ClientSignals::default();

    if let Failure::Transport(t) = failure {
        if t.origin == TransportOrigin::Request {
            signals.transport = true;
            let message = t.message.to_lowercase();
            if message.contains("failed") {
                signals.request = Some(ClientKind::Fetch);
            }
            if message.contains("network") {
                signals.request = Some(ClientKind::Network);
            }
        }
    }

    if let Some(message) = failure.message() {
        let message = message.to_lowercase();
        signals.aborted = message.contains("abort");
        signals.security = message.contains("security");
    }

    signals.syntax = matches!(failure, Failure::Parse(_));
    signals
}
