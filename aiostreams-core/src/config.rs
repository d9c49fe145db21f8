use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub presets: PresetDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            pool_max_idle_per_host: 10,
        }
    }
}

/// Addon timeout bounds shared by every preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetDefaults {
    pub default_timeout_ms: u64,
    pub min_timeout_ms: u64,
    pub max_timeout_ms: u64,
}

impl Default for PresetDefaults {
    fn default() -> Self {
        Self {
            default_timeout_ms: 15_000,
            min_timeout_ms: 1_000,
            max_timeout_ms: 50_000,
        }
    }
}

impl PresetDefaults {
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

impl Config {
    /// Load configuration
    ///
    /// Sources, lowest priority first:
    /// 1. Built-in defaults
    /// 2. Config file (if provided and present)
    /// 3. Environment variables (`AIOSTREAMS_PRESETS__DEFAULT_TIMEOUT_MS`, ...)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Double underscore separates sections so field names keep their own underscores
        builder = builder.add_source(
            Environment::with_prefix("AIOSTREAMS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate settings, returning every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "warning" | "error"
        ) {
            errors.push(format!("Invalid logging.level: {}", self.logging.level));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "Invalid logging.format: {} (expected \"json\" or \"pretty\")",
                self.logging.format
            ));
        }
        if self.http.connect_timeout_ms == 0 {
            errors.push("http.connect_timeout_ms must be greater than 0".to_string());
        }

        let presets = &self.presets;
        if presets.min_timeout_ms > presets.max_timeout_ms {
            errors.push(format!(
                "presets.min_timeout_ms ({}) exceeds presets.max_timeout_ms ({})",
                presets.min_timeout_ms, presets.max_timeout_ms
            ));
        }
        if presets.default_timeout_ms < presets.min_timeout_ms
            || presets.default_timeout_ms > presets.max_timeout_ms
        {
            errors.push(format!(
                "presets.default_timeout_ms ({}) must be within [{}, {}]",
                presets.default_timeout_ms, presets.min_timeout_ms, presets.max_timeout_ms
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
