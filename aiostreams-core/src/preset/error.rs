// Preset Error Types

/// Preset-specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresetError {
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Missing required option: {0}")]
    MissingOption(String),

    #[error("Invalid option {id}: {reason}")]
    InvalidOption { id: String, reason: String },

    #[error("Preset {0} is already registered")]
    AlreadyRegistered(String),
}

impl PresetError {
    pub fn invalid(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PresetError>;
