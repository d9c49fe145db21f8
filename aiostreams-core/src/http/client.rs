//! reqwest-backed `HttpSender`

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::error::{check_response, HttpError, MAX_RESPONSE_SIZE};
use super::{HttpResponse, HttpSender, RequestOptions};
use crate::config::HttpConfig;

/// Shared HTTP client for addon requests (connection pooling)
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    build_client(&HttpConfig::default()).expect("Failed to build shared addon HTTP client")
});

fn build_client(config: &HttpConfig) -> Result<Client, HttpError> {
    Client::builder()
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .build()
        .map_err(|e| HttpError::InvalidConfig(format!("Failed to build HTTP client: {e}")))
}

/// HTTP sender backed by a pooled reqwest client
#[derive(Clone)]
pub struct ReqwestSender {
    client: Client,
}

impl ReqwestSender {
    /// Sender using the process-wide shared client
    #[must_use]
    pub fn shared() -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
        }
    }

    /// Sender with a dedicated client built from configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, HttpError> {
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

impl Default for ReqwestSender {
    fn default() -> Self {
        Self::shared()
    }
}

/// Read a response body, enforcing `MAX_RESPONSE_SIZE`.
async fn body_with_limit(response: reqwest::Response, timeout: Duration) -> Result<Bytes, HttpError> {
    if let Some(len) = response.content_length() {
        if len as usize > MAX_RESPONSE_SIZE {
            return Err(HttpError::ResponseTooLarge { size: len });
        }
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| HttpError::from_reqwest(&e, timeout))?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(HttpError::ResponseTooLarge {
            size: bytes.len() as u64,
        });
    }
    Ok(bytes)
}

#[async_trait]
impl HttpSender for ReqwestSender {
    async fn send(&self, url: &Url, options: RequestOptions) -> Result<HttpResponse, HttpError> {
        let timeout = options.timeout;
        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .timeout(timeout);

        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(&e, timeout))?;
        let response = check_response(response)?;
        let status = response.status();

        let body = if options.read_body {
            body_with_limit(response, timeout).await?
        } else {
            Bytes::new()
        };

        debug!(
            method = %options.method,
            url = %url,
            status = %status,
            bytes = body.len(),
            "Addon request completed"
        );

        Ok(HttpResponse { status, body })
    }
}
