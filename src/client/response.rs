//! Response decoding and failure normalization.

use crate::failure::{ErrorResponse, Failure, ParseFailure, StructuredFailure};
use crate::transport::HttpTransport;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct FetchResponse<T> {
    pub status: u16,
    pub url: Url,
    pub headers: HeaderMap,
    /// Decoded body when the response declared a JSON content type.
    pub data: Option<T>,
    /// Raw body when the response was not JSON; empty otherwise.
    pub text: String,
}

impl<T> FetchResponse<T> {
    pub fn is_json(&self) -> bool {
        is_json(&self.headers)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Whether the headers declare a JSON body (`content-type` containing `json`).
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("json"))
        .unwrap_or(false)
}

pub(crate) async fn decode<T: DeserializeOwned>(
    resp: reqwest::Response,
    abort: Option<&CancellationToken>,
) -> Result<FetchResponse<T>, Failure> {
    let status = resp.status().as_u16();
    let url = resp.url().clone();
    let headers = resp.headers().clone();
    let text = HttpTransport::read_text(resp, abort).await?;

    if !resp_ok(status) {
        return Err(error_failure(status, &url, headers, text));
    }

    if is_json(&headers) {
        let data: T = serde_json::from_str(&text).map_err(ParseFailure::from)?;
        Ok(FetchResponse {
            status,
            url,
            headers,
            data: Some(data),
            text: String::new(),
        })
    } else {
        Ok(FetchResponse {
            status,
            url,
            headers,
            data: None,
            text,
        })
    }
}

fn resp_ok(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Turn a non-2xx response into the failure the executor raises.
pub(crate) fn error_failure(status: u16, url: &Url, headers: HeaderMap, text: String) -> Failure {
    if is_json(&headers) {
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(body)) => return StructuredFailure::from_body(status, body).into(),
            Ok(_) => {}
            Err(e) => return ParseFailure::from(e).into(),
        }
    }

    ErrorResponse {
        status,
        url: url.to_string(),
        headers,
        text,
    }
    .into()
}
