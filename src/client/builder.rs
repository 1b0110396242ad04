use crate::client::core::Fetchy;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builder for [`Fetchy`] clients.
///
/// Nothing is read from the environment unless [`FetchyBuilder::from_env`] is used.
#[derive(Debug, Clone, Default)]
pub struct FetchyBuilder {
    base_url: Option<String>,
    default_headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_max_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
    proxy_url: Option<String>,
    user_agent: Option<String>,
    https_only: bool,
}

impl FetchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded from environment variables:
    /// - `FETCHY_HTTP_TIMEOUT_SECS`
    /// - `FETCHY_HTTP_POOL_MAX_IDLE_PER_HOST`
    /// - `FETCHY_HTTP_POOL_IDLE_TIMEOUT_SECS`
    /// - `FETCHY_PROXY_URL`
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        builder.timeout = env_parse::<u64>("FETCHY_HTTP_TIMEOUT_SECS").map(Duration::from_secs);
        builder.pool_max_idle_per_host = env_parse::<usize>("FETCHY_HTTP_POOL_MAX_IDLE_PER_HOST");
        builder.pool_idle_timeout =
            env_parse::<u64>("FETCHY_HTTP_POOL_IDLE_TIMEOUT_SECS").map(Duration::from_secs);
        builder.proxy_url = std::env::var("FETCHY_PROXY_URL").ok().filter(|s| !s.is_empty());
        builder
    }

    /// Base URL that relative request URLs are joined onto.
    ///
    /// Joining follows RFC 3986: keep a trailing `/` on the base to append paths.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Header sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Client-wide deadline. Per-request timeouts override it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn pool_max_idle_per_host(mut self, n: usize) -> Self {
        self.pool_max_idle_per_host = Some(n);
        self
    }

    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Refuse plain `http` URLs with a security failure.
    pub fn https_only(mut self, enable: bool) -> Self {
        self.https_only = enable;
        self
    }

    pub fn build(self) -> Result<Fetchy> {
        let base_url = self.base_url.as_deref().map(Url::parse).transpose()?;

        let mut builder = reqwest::Client::builder().default_headers(self.header_map()?);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(n) = self.pool_max_idle_per_host {
            builder = builder.pool_max_idle_per_host(n);
        }
        if let Some(timeout) = self.pool_idle_timeout {
            builder = builder.pool_idle_timeout(timeout);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        if let Some(proxy_url) = &self.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        let client = builder.build()?;

        Ok(Fetchy {
            transport: Arc::new(HttpTransport::new(client, base_url, self.https_only)),
        })
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid header name: {}", e),
                    ErrorContext::new()
                        .with_field_path("builder.default_headers")
                        .with_details(name.clone())
                        .with_source("fetchy_builder"),
                )
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid header value: {}", e),
                    ErrorContext::new()
                        .with_field_path("builder.default_headers")
                        .with_details(name.clone())
                        .with_source("fetchy_builder"),
                )
            })?;
            headers.append(header_name, header_value);
        }
        Ok(headers)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse::<T>().ok())
}
