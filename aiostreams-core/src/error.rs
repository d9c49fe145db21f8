use thiserror::Error;

use crate::http::HttpError;
use crate::preset::PresetError;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Preset(#[from] PresetError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Addon {0} has no manifest URL")]
    MissingManifestUrl(String),

    #[error("Addon {addon} has an invalid manifest URL: {reason}")]
    InvalidManifestUrl { addon: String, reason: String },

    #[error("Invalid addon response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
