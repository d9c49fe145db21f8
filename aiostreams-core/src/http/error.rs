//! Outbound HTTP error types

use std::time::Duration;
use thiserror::Error;

/// Maximum response body size read from an addon (16 MB).
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("HTTP error {status} for {url}")]
    Http { status: reqwest::StatusCode, url: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Response too large ({size} bytes, max {MAX_RESPONSE_SIZE})")]
    ResponseTooLarge { size: u64 },
}

impl HttpError {
    /// Classify a reqwest failure, reporting timeouts with the configured bound
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Check HTTP response status before processing body.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, HttpError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(HttpError::Http {
            status,
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}
