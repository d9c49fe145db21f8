// Preset System
//
// A preset describes one addon integration: its identity and option schema, a
// factory turning user options into addon instances, the parser used for
// those instances, and a hook run on every normalized batch.
//
// Presets are registered once at startup in a `PresetRegistry`.

pub mod error;
pub mod options;
pub mod registry;

pub use error::*;
pub use options::{base_options, validate_options};
pub use registry::*;

use crate::config::PresetDefaults;
use crate::dispatch::ReportDispatcher;
use crate::http::{HttpSender, USER_AGENT};
use crate::models::{
    default_addon_headers, Addon, MediaType, OptionDefinition, ParsedStream, PresetConfig,
    PresetInstance, Resource, StreamType, UserData,
};
use crate::parser::{DefaultStreamParser, StreamParser};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Streams,
    Subtitles,
    Meta,
    Misc,
}

/// Static description of a preset
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(serialize_with = "serialize_millis")]
    pub timeout: Duration,
    pub user_agent: String,
    pub supported_services: Vec<String>,
    pub supported_resources: Vec<Resource>,
    pub supported_stream_types: Vec<StreamType>,
    pub category: PresetCategory,
    pub options: Vec<OptionDefinition>,
}

impl PresetMetadata {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            logo: None,
            url: None,
            timeout,
            user_agent: USER_AGENT.to_string(),
            supported_services: Vec::new(),
            supported_resources: vec![Resource::Stream],
            supported_stream_types: Vec::new(),
            category: PresetCategory::Streams,
            options: Vec::new(),
        }
    }

    /// Option definition by id
    #[must_use]
    pub fn option(&self, id: &str) -> Option<&OptionDefinition> {
        self.options.iter().find(|o| o.id == id)
    }
}

fn serialize_millis<S: serde::Serializer>(
    value: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

/// Capabilities handed to presets when they are constructed
#[derive(Clone)]
pub struct PresetContext {
    pub http: Arc<dyn HttpSender>,
    pub dispatcher: ReportDispatcher,
    pub defaults: PresetDefaults,
}

impl PresetContext {
    #[must_use]
    pub fn new(http: Arc<dyn HttpSender>, dispatcher: ReportDispatcher, defaults: PresetDefaults) -> Self {
        Self {
            http,
            dispatcher,
            defaults,
        }
    }
}

/// Addon integration
pub trait Preset: Send + Sync {
    fn metadata(&self) -> &PresetMetadata;

    /// Build addon instances from one preset entry of the user configuration
    ///
    /// Options have already been checked against `metadata().options`.
    fn generate_addons(&self, user: &UserData, config: &PresetConfig) -> Result<Vec<Addon>>;

    /// Parser for streams produced by `addon`
    fn parser(&self, addon: Arc<Addon>) -> Box<dyn StreamParser> {
        Box::new(DefaultStreamParser::new(addon))
    }

    /// Called once with every normalized batch from this preset's addons
    ///
    /// Must return promptly and never fail; any I/O has to be detached.
    fn on_streams_ready(&self, _streams: &[ParsedStream]) {}
}

/// Build one addon from resolved options
///
/// Every field falls back to the metadata default when its option is absent
/// or empty.
#[must_use]
pub fn generate_addon(metadata: &PresetMetadata, config: &PresetConfig) -> Addon {
    let options = &config.options;
    let non_empty_str = |id: &str| {
        options
            .get(id)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let timeout = options
        .get("timeout")
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f as u64)))
        .filter(|ms| *ms > 0)
        .map_or(metadata.timeout, Duration::from_millis);

    Addon {
        name: non_empty_str("name").unwrap_or_else(|| metadata.name.clone()),
        manifest_url: non_empty_str("url"),
        enabled: options
            .get("enabled")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        media_types: decode_list::<MediaType>(options.get("mediaTypes")).unwrap_or_default(),
        resources: decode_list::<Resource>(options.get("resources"))
            .unwrap_or_else(|| metadata.supported_resources.clone()),
        timeout,
        preset: PresetInstance {
            id: config.instance_id.clone(),
            preset_type: metadata.id.clone(),
            options: options.clone(),
        },
        headers: default_addon_headers(),
    }
}

fn decode_list<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> Option<Vec<T>> {
    value.and_then(|v| serde_json::from_value(v.clone()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> PresetMetadata {
        PresetMetadata::new("test", "Test", Duration::from_millis(15_000))
    }

    fn config(options: Value) -> PresetConfig {
        PresetConfig::new("test", options.as_object().cloned().unwrap())
    }

    #[test]
    fn test_generate_addon_defaults() {
        let addon = generate_addon(&metadata(), &config(json!({})));

        assert_eq!(addon.name, "Test");
        assert_eq!(addon.manifest_url, None);
        assert!(addon.enabled);
        assert!(addon.media_types.is_empty());
        assert_eq!(addon.resources, vec![Resource::Stream]);
        assert_eq!(addon.timeout, Duration::from_millis(15_000));
        assert_eq!(addon.preset.preset_type, "test");
        assert_eq!(addon.headers.get("User-Agent").map(String::as_str), Some("AIOStreams"));
    }

    #[test]
    fn test_generate_addon_uses_options() {
        let addon = generate_addon(
            &metadata(),
            &config(json!({
                "name": "My NZB",
                "url": "https://nzb.example.com/manifest.json",
                "timeout": 7000,
                "mediaTypes": ["movie"],
                "resources": ["stream"],
            }))
            .with_instance_id("abc"),
        );

        assert_eq!(addon.name, "My NZB");
        assert_eq!(
            addon.manifest_url.as_deref(),
            Some("https://nzb.example.com/manifest.json")
        );
        assert_eq!(addon.timeout, Duration::from_millis(7000));
        assert_eq!(addon.media_types, vec![MediaType::Movie]);
        assert_eq!(addon.preset.id, "abc");
        assert_eq!(addon.option_str("url"), Some("https://nzb.example.com/manifest.json"));
    }

    #[test]
    fn test_generate_addon_ignores_unusable_values() {
        let addon = generate_addon(
            &metadata(),
            &config(json!({ "name": "", "timeout": 0, "resources": "stream", "url": "" })),
        );

        assert_eq!(addon.name, "Test");
        assert_eq!(addon.timeout, Duration::from_millis(15_000));
        assert_eq!(addon.resources, vec![Resource::Stream]);
        assert_eq!(addon.manifest_url, None);
    }

    #[test]
    fn test_metadata_serializes_timeout_as_millis() {
        let value = serde_json::to_value(metadata()).unwrap();
        assert_eq!(value["timeout"], json!(15_000));
        assert_eq!(value["userAgent"], "AIOStreams");
        assert_eq!(value["supportedResources"], json!(["stream"]));
    }
}
