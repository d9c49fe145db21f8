//! Addon instances and the user configuration they are built from

use crate::http::USER_AGENT;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// Resolved option values for one preset instance, keyed by option id
pub type PresetOptions = Map<String, Value>;

/// Addon resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Stream,
    Catalog,
    Meta,
    Subtitles,
    AddonCatalog,
}

impl Resource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::Catalog => "catalog",
            Self::Meta => "meta",
            Self::Subtitles => "subtitles",
            Self::AddonCatalog => "addon_catalog",
        }
    }
}

/// Media type an addon can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
    Anime,
    Channel,
    Tv,
}

impl MediaType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Anime => "anime",
            Self::Channel => "channel",
            Self::Tv => "tv",
        }
    }
}

/// Identity of the preset that built an addon, with the options it was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetInstance {
    /// Instance id from the user configuration (may be empty)
    pub id: String,
    /// Preset id (e.g. "streamnzb")
    #[serde(rename = "type")]
    pub preset_type: String,
    pub options: PresetOptions,
}

/// Configured runtime addon
///
/// Built once from user configuration and shared read-only (via `Arc`) by
/// every stream it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_url: Option<String>,
    pub enabled: bool,
    #[serde(default)]
    pub media_types: Vec<MediaType>,
    pub resources: Vec<Resource>,
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
    pub preset: PresetInstance,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Addon {
    /// Key used to group streams by origin instance
    #[must_use]
    pub fn manifest_key(&self) -> &str {
        self.manifest_url.as_deref().unwrap_or_default()
    }

    /// String option this addon was configured with
    #[must_use]
    pub fn option_str(&self, id: &str) -> Option<&str> {
        self.preset.options.get(id).and_then(Value::as_str)
    }

    #[must_use]
    pub fn supports(&self, resource: Resource) -> bool {
        self.resources.contains(&resource)
    }
}

/// Fixed headers attached to every addon's outbound requests
#[must_use]
pub fn default_addon_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("User-Agent".to_string(), USER_AGENT.to_string())])
}

/// One preset entry in a user's configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetConfig {
    /// Preset id (e.g. "streamnzb")
    #[serde(rename = "type")]
    pub preset_type: String,
    #[serde(default)]
    pub instance_id: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub options: PresetOptions,
}

impl PresetConfig {
    #[must_use]
    pub fn new(preset_type: impl Into<String>, options: PresetOptions) -> Self {
        Self {
            preset_type: preset_type.into(),
            instance_id: String::new(),
            enabled: true,
            options,
        }
    }

    #[must_use]
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }
}

/// User configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default)]
    pub presets: Vec<PresetConfig>,
}

const fn default_true() -> bool {
    true
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
