//! Canonical normalized stream shared by every preset
//!
//! `ParsedStream` is output-only: it serializes for presentation but is never
//! decoded back into the pipeline.

use super::Addon;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Stream kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Http,
    Usenet,
    Debrid,
    P2p,
    Live,
    Youtube,
    External,
    Error,
}

impl StreamType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Usenet => "usenet",
            Self::Debrid => "debrid",
            Self::P2p => "p2p",
            Self::Live => "live",
            Self::Youtube => "youtube",
            Self::External => "external",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service id for streams fetched directly over NNTP
pub const STREMIO_NNTP_SERVICE: &str = "stremio_nntp";

/// Service that serves the stream, with its cache state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: String,
    pub cached: bool,
}

impl Service {
    #[must_use]
    pub fn new(id: impl Into<String>, cached: bool) -> Self {
        Self {
            id: id.into(),
            cached,
        }
    }
}

/// Torrent reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Torrent {
    pub info_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_idx: Option<u64>,
}

/// Normalized stream
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStream {
    #[serde(rename = "type")]
    pub stream_type: StreamType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,

    /// Opaque correlation token copied from the raw stream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failover_id: Option<Value>,

    /// Addon instance that produced this stream
    #[serde(serialize_with = "serialize_addon_ref")]
    pub addon: Arc<Addon>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nzb_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub yt_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub torrent: Option<Torrent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub binge_group: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_hash: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub not_web_ready: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_description: Option<String>,
}

impl ParsedStream {
    /// Empty stream of the given type bound to an addon
    #[must_use]
    pub fn new(addon: Arc<Addon>, stream_type: StreamType) -> Self {
        Self {
            stream_type,
            service: None,
            failover_id: None,
            addon,
            url: None,
            nzb_url: None,
            external_url: None,
            yt_id: None,
            torrent: None,
            filename: None,
            size: None,
            binge_group: None,
            video_hash: None,
            not_web_ready: false,
            original_name: None,
            original_description: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddonRef<'a> {
    name: &'a str,
    preset_type: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    instance_id: &'a str,
}

fn is_blank(value: &&str) -> bool {
    value.is_empty()
}

fn serialize_addon_ref<S: Serializer>(addon: &Arc<Addon>, serializer: S) -> Result<S::Ok, S::Error> {
    AddonRef {
        name: &addon.name,
        preset_type: &addon.preset.preset_type,
        instance_id: &addon.preset.id,
    }
    .serialize(serializer)
}
