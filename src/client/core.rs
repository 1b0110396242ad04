use crate::client::builder::FetchyBuilder;
use crate::client::options::RequestOptions;
use crate::client::response::{self, FetchResponse};
use crate::failure::Failure;
use crate::transport::HttpTransport;
use crate::Result;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

/// HTTP methods the executor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request executor. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct Fetchy {
    pub(crate) transport: Arc<HttpTransport>,
}

impl Fetchy {
    /// Client with default settings: no base URL, no client-wide timeout.
    pub fn new() -> Result<Self> {
        FetchyBuilder::new().build()
    }

    pub fn builder() -> FetchyBuilder {
        FetchyBuilder::new()
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.transport.base_url()
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        options: Option<RequestOptions>,
    ) -> std::result::Result<FetchResponse<T>, Failure> {
        self.request(Method::Get, url, options).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        url: &str,
        options: Option<RequestOptions>,
    ) -> std::result::Result<FetchResponse<T>, Failure> {
        self.request(Method::Put, url, options).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        options: Option<RequestOptions>,
    ) -> std::result::Result<FetchResponse<T>, Failure> {
        self.request(Method::Post, url, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        options: Option<RequestOptions>,
    ) -> std::result::Result<FetchResponse<T>, Failure> {
        self.request(Method::Delete, url, options).await
    }

    /// Issue one request and decode the outcome.
    ///
    /// - 2xx: JSON bodies (content type containing `json`) decode into `data`,
    ///   anything else lands in `text`.
    /// - non-2xx: a JSON object body becomes [`Failure::Structured`] with the
    ///   status merged in; any other body becomes [`Failure::Response`].
    /// - transport and parse errors are returned as they occur.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        options: Option<RequestOptions>,
    ) -> std::result::Result<FetchResponse<T>, Failure> {
        let options = options.unwrap_or_default();
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let url = self.transport.resolve_url(url)?;
        debug!(
            method = method.as_str(),
            url = %url,
            request_id = request_id.as_str(),
            "sending request"
        );

        let resp = match self.transport.send(method.into(), url, &options).await {
            Ok(resp) => resp,
            Err(failure) => {
                info!(
                    method = method.as_str(),
                    request_id = request_id.as_str(),
                    failure_kind = failure.kind(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %failure,
                    "fetchy request failed before a response arrived"
                );
                return Err(failure);
            }
        };

        let http_status = resp.status().as_u16();
        let outcome = response::decode::<T>(resp, options.abort_token()).await;

        match &outcome {
            Ok(_) => debug!(
                method = method.as_str(),
                request_id = request_id.as_str(),
                http_status,
                duration_ms = start.elapsed().as_millis() as u64,
                "request completed"
            ),
            Err(failure) => info!(
                method = method.as_str(),
                request_id = request_id.as_str(),
                http_status,
                failure_kind = failure.kind(),
                duration_ms = start.elapsed().as_millis() as u64,
                "fetchy request failed"
            ),
        }

        outcome
    }
}
