use crate::client::RequestOptions;
use crate::failure::{Failure, TransportFailure};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use url::Url;

const ABORT_MESSAGE: &str = "the operation was aborted";

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Option<Url>,
    https_only: bool,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client, base_url: Option<Url>, https_only: bool) -> Self {
        Self {
            client,
            base_url,
            https_only,
        }
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Resolve `url` as absolute, or relative to the base URL when one is set.
    pub fn resolve_url(&self, url: &str) -> Result<Url, Failure> {
        let parsed = match &self.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        parsed.map_err(|e| {
            TransportFailure::request(format!("fetch failed: invalid URL '{}': {}", url, e)).into()
        })
    }

    /// Issue one request. The response is returned whatever its status.
    pub async fn send(
        &self,
        method: reqwest::Method,
        url: Url,
        options: &RequestOptions,
    ) -> Result<reqwest::Response, Failure> {
        if self.https_only && url.scheme() != "https" {
            warn!(url = %url, "blocked insecure request");
            return Err(TransportFailure::security(format!(
                "security error: insecure request to '{}' blocked by https-only policy",
                url
            ))
            .into());
        }

        let request = options.apply(self.client.request(method, url));
        race_abort(options.abort_token(), request.send()).await
    }

    /// Read the full response body as text.
    pub async fn read_text(
        response: reqwest::Response,
        abort: Option<&CancellationToken>,
    ) -> Result<String, Failure> {
        race_abort(abort, response.text()).await
    }
}

/// Run `fut` unless `abort` fires first. An already-cancelled token always wins.
async fn race_abort<T, F>(abort: Option<&CancellationToken>, fut: F) -> Result<T, Failure>
where
    F: Future<Output = Result<T, reqwest::Error>>,
{
    match abort {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(TransportFailure::aborted(ABORT_MESSAGE).into()),
            res = fut => res.map_err(Failure::from),
        },
        None => fut.await.map_err(Failure::from),
    }
}
