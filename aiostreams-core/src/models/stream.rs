//! Raw stream objects as emitted by an addon's stream resource.
//!
//! Everything here is source-controlled. Known fields are decoded leniently and
//! unknown fields are kept verbatim in `extra`.

use super::lenient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stremio-style stream descriptor returned by an addon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub nzb_url: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub yt_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_u64", skip_serializing_if = "Option::is_none")]
    pub file_idx: Option<u64>,

    #[serde(default, deserialize_with = "lenient::opt_nested", skip_serializing_if = "Option::is_none")]
    pub behavior_hints: Option<BehaviorHints>,

    /// Source-defined fields (e.g. `failoverId`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Playback hints attached to a raw stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub binge_group: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Size in bytes
    #[serde(default, deserialize_with = "lenient::opt_u64", skip_serializing_if = "Option::is_none")]
    pub video_size: Option<u64>,

    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub video_hash: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub not_web_ready: Option<bool>,

    /// Tri-state cache hint: `Some(true)`, `Some(false)` or absent
    #[serde(default, deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Stream {
    /// Source-defined field by key, treating JSON `null` as absent
    #[must_use]
    pub fn extra_field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key).filter(|v| !v.is_null())
    }

    /// The cache hint from `behaviorHints.cached`
    #[must_use]
    pub fn cached_hint(&self) -> Option<bool> {
        self.behavior_hints.as_ref().and_then(|h| h.cached)
    }

    /// Whether the stream points at anything playable
    #[must_use]
    pub fn has_target(&self) -> bool {
        [
            &self.url,
            &self.nzb_url,
            &self.external_url,
            &self.yt_id,
            &self.info_hash,
        ]
        .into_iter()
        .any(|field| field.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_keeps_extra_fields() {
        let stream: Stream = serde_json::from_value(json!({
            "name": "StreamNZB",
            "nzbUrl": "https://nzb.example.com/get/1",
            "failoverId": "grp-1",
            "behaviorHints": { "cached": true, "bingeGroup": "nzb|1080p" }
        }))
        .unwrap();

        assert_eq!(stream.nzb_url.as_deref(), Some("https://nzb.example.com/get/1"));
        assert_eq!(stream.extra_field("failoverId"), Some(&json!("grp-1")));
        assert_eq!(stream.cached_hint(), Some(true));
    }

    #[test]
    fn test_wrong_types_decode_as_absent() {
        let stream: Stream = serde_json::from_value(json!({
            "url": 42,
            "fileIdx": "3",
            "behaviorHints": { "cached": "yes", "videoSize": "not a number" }
        }))
        .unwrap();

        assert_eq!(stream.url, None);
        assert_eq!(stream.file_idx, Some(3));
        assert_eq!(stream.cached_hint(), None);
        assert_eq!(stream.behavior_hints.unwrap().video_size, None);
    }

    #[test]
    fn test_non_object_hints_are_absent() {
        let stream: Stream =
            serde_json::from_value(json!({ "url": "https://a/b.mkv", "behaviorHints": [1, 2] }))
                .unwrap();
        assert!(stream.behavior_hints.is_none());
        assert_eq!(stream.cached_hint(), None);
    }

    #[test]
    fn test_null_extra_field_is_absent() {
        let stream: Stream = serde_json::from_value(json!({ "failoverId": null })).unwrap();
        assert!(stream.extra_field("failoverId").is_none());
    }

    #[test]
    fn test_has_target() {
        assert!(!Stream::default().has_target());
        let blank = Stream {
            url: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!blank.has_target());
        let nzb = Stream {
            nzb_url: Some("https://x/y.nzb".to_string()),
            ..Default::default()
        };
        assert!(nzb.has_target());
    }
}
