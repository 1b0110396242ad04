//! Request executor.
//!
//! [`Fetchy`] issues exactly one GET/PUT/POST/DELETE per call and normalizes the
//! outcome: a decoded [`FetchResponse`] on 2xx, otherwise a [`Failure`] ready to be
//! handed to [`crate::handle_error`]. There are no retries.
//!
//! The free functions [`get`], [`put`], [`post`] and [`delete`] use a lazily built
//! client with default settings.

pub mod builder;
pub mod core;
pub mod options;
pub mod response;

pub use builder::FetchyBuilder;
pub use self::core::{Fetchy, Method};
pub use options::{Credentials, RequestBody, RequestOptions};
pub use response::FetchResponse;

use crate::failure::{Failure, TransportFailure};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

static DEFAULT_CLIENT: Lazy<std::result::Result<Fetchy, String>> =
    Lazy::new(|| Fetchy::new().map_err(|e| e.to_string()));

fn default_client() -> Result<&'static Fetchy, Failure> {
    DEFAULT_CLIENT.as_ref().map_err(|msg| {
        TransportFailure::request(format!("fetch failed: default client unavailable: {}", msg))
            .into()
    })
}

/// `GET url` with the default client.
pub async fn get<T: DeserializeOwned>(
    url: &str,
    options: Option<RequestOptions>,
) -> Result<FetchResponse<T>, Failure> {
    default_client()?.get(url, options).await
}

/// `PUT url` with the default client.
pub async fn put<T: DeserializeOwned>(
    url: &str,
    options: Option<RequestOptions>,
) -> Result<FetchResponse<T>, Failure> {
    default_client()?.put(url, options).await
}

/// `POST url` with the default client.
pub async fn post<T: DeserializeOwned>(
    url: &str,
    options: Option<RequestOptions>,
) -> Result<FetchResponse<T>, Failure> {
    default_client()?.post(url, options).await
}

/// `DELETE url` with the default client.
pub async fn delete<T: DeserializeOwned>(
    url: &str,
    options: Option<RequestOptions>,
) -> Result<FetchResponse<T>, Failure> {
    default_client()?.delete(url, options).await
}
