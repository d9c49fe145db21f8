// Outbound HTTP capability
//
// Presets and the pipeline talk to addons through `HttpSender` so tests can
// substitute a recording sender for the reqwest-backed one.

pub mod client;
pub mod error;

pub use client::ReqwestSender;
pub use error::HttpError;

pub use reqwest::{Method, StatusCode};

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Identifying User-Agent sent on every outbound request
pub const USER_AGENT: &str = "AIOStreams";

/// Options for a single outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub timeout: Duration,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    /// Whether the response body is read
    pub read_body: bool,
}

impl RequestOptions {
    /// GET request that reads the response body
    #[must_use]
    pub fn get(timeout: Duration) -> Self {
        Self {
            method: Method::GET,
            timeout,
            headers: BTreeMap::new(),
            body: None,
            read_body: true,
        }
    }

    /// POST with a JSON body
    #[must_use]
    pub fn post_json(body: String, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            timeout,
            headers: BTreeMap::new(),
            body: Some(body),
            read_body: true,
        }
        .with_header("Content-Type", "application/json")
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    /// Do not read the response body
    #[must_use]
    pub const fn discard_body(mut self) -> Self {
        self.read_body = false;
        self
    }
}

/// Response of a successful (2xx) request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpResponse {
    /// Decode the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Sends outbound requests
///
/// Non-2xx responses are errors.
#[async_trait]
pub trait HttpSender: Send + Sync {
    async fn send(&self, url: &Url, options: RequestOptions) -> Result<HttpResponse, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_json_sets_content_type() {
        let options = RequestOptions::post_json("{}".to_string(), Duration::from_secs(5));
        assert_eq!(options.method, Method::POST);
        assert_eq!(
            options.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert!(options.read_body);
        assert!(!options.discard_body().read_body);
    }
}
