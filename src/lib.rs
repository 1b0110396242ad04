//! # fetchy
//!
//! A thin HTTP request wrapper plus a declarative error-classification dispatcher.
//!
//! ## Overview
//!
//! - **Request executor**: [`Fetchy`] (and the free functions [`get`], [`put`],
//!   [`post`], [`delete`]) performs one call, decodes JSON or text on success and
//!   returns a [`Failure`] on anything else.
//! - **Failure classifier**: [`handle_error`] takes that failure and a
//!   [`CallbackConfig`] and invokes the callbacks matching its client/transport
//!   subtype, HTTP status and body fields, with `other` and `all` fallbacks.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fetchy::{handle_error, CallbackConfig, ClientCallbacks, ClientKind, StatusCallbacks};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() {
//!     match fetchy::get::<Value>("https://api.example.com/me", None).await {
//!         Ok(resp) => println!("{:?}", resp.data),
//!         Err(failure) => handle_error(
//!             &failure,
//!             &CallbackConfig::new()
//!                 .status(
//!                     StatusCallbacks::new()
//!                         .on(401, |_| println!("please sign in"))
//!                         .other(|f| eprintln!("server said no: {}", f)),
//!                 )
//!                 .on_field("error_message", |_, msg| eprintln!("reason: {}", msg))
//!                 .client(ClientCallbacks::new().on(ClientKind::Network, |_| eprintln!("offline?")))
//!                 .other(|f| eprintln!("unexpected: {}", f)),
//!         ),
//!     }
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Request executor, options, builder |
//! | [`classify`] | Failure classifier and callback configuration |
//! | [`failure`] | The failure value shapes |
//! | [`transport`] | Adapter over `reqwest` |

pub mod classify;
pub mod client;
pub mod error;
pub mod failure;
pub mod transport;

pub use classify::{
    handle_error, BodyCallbacks, CallbackConfig, ClientCallbacks, ClientKind, StatusCallbacks,
};
pub use client::{
    delete, get, post, put, FetchResponse, Fetchy, FetchyBuilder, Method, RequestOptions,
};
pub use error::{Error, ErrorContext};
pub use failure::{
    ErrorResponse, Failure, ParseFailure, StructuredFailure, TransportFailure, TransportOrigin,
};

/// Result type alias for client construction.
pub type Result<T> = std::result::Result<T, Error>;
