//! StreamNZB stream parser
//!
//! On top of the generic normalization:
//! - `behaviorHints.cached` decides the cache state (`stremio_nntp` when no
//!   service was detected),
//! - every stream is `usenet`,
//! - `failoverId` is carried through verbatim.

use aiostreams_core::models::{Addon, ParsedStream, Service, Stream, StreamType, STREMIO_NNTP_SERVICE};
use aiostreams_core::parser::{generic, StreamParser};
use serde_json::Value;
use std::sync::Arc;

/// Raw stream field holding the failover correlation token
pub const FAILOVER_ID_FIELD: &str = "failoverId";

pub struct StreamNzbParser {
    addon: Arc<Addon>,
}

impl StreamNzbParser {
    #[must_use]
    pub const fn new(addon: Arc<Addon>) -> Self {
        Self { addon }
    }
}

impl StreamParser for StreamNzbParser {
    fn addon(&self) -> &Arc<Addon> {
        &self.addon
    }

    fn classify_service(&self, stream: &Stream, _current: &ParsedStream) -> Option<Service> {
        let base = generic::detect_service(stream);
        match stream.cached_hint() {
            Some(cached) => Some(match base {
                Some(service) => Service { cached, ..service },
                None => Service::new(STREMIO_NNTP_SERVICE, cached),
            }),
            None => base,
        }
    }

    fn classify_type(&self, _: &Stream, _: Option<&Service>, _: &ParsedStream) -> StreamType {
        StreamType::Usenet
    }

    fn extract_failover_id(&self, stream: &Stream) -> Option<Value> {
        stream.extra_field(FAILOVER_ID_FIELD).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiostreams_core::models::{default_addon_headers, PresetInstance, PresetOptions, Resource};
    use aiostreams_core::parser::ParseOutcome;
    use serde_json::json;
    use std::time::Duration;

    fn parser() -> StreamNzbParser {
        StreamNzbParser::new(Arc::new(Addon {
            name: "StreamNZB".to_string(),
            manifest_url: Some("https://nzb.example.com/manifest.json".to_string()),
            enabled: true,
            media_types: Vec::new(),
            resources: vec![Resource::Stream],
            timeout: Duration::from_secs(15),
            preset: PresetInstance {
                id: String::new(),
                preset_type: "streamnzb".to_string(),
                options: PresetOptions::new(),
            },
            headers: default_addon_headers(),
        }))
    }

    fn parse(value: serde_json::Value) -> ParsedStream {
        let stream: Stream = serde_json::from_value(value).unwrap();
        parser().parse(&stream).into_parsed().expect("stream should parse")
    }

    #[test]
    fn test_cached_true_without_generic_service() {
        let parsed = parse(json!({
            "name": "StreamNZB 1080p",
            "url": "https://nzb.example.com/play/1",
            "behaviorHints": { "cached": true }
        }));
        assert_eq!(parsed.service, Some(Service::new("stremio_nntp", true)));
    }

    #[test]
    fn test_cached_false_without_generic_service() {
        let parsed = parse(json!({
            "url": "https://nzb.example.com/play/1",
            "behaviorHints": { "cached": false }
        }));
        assert_eq!(parsed.service, Some(Service::new("stremio_nntp", false)));
    }

    #[test]
    fn test_cached_hint_merges_into_generic_service() {
        let parsed = parse(json!({
            "name": "[TB+] StreamNZB",
            "url": "https://nzb.example.com/play/1",
            "behaviorHints": { "cached": false }
        }));
        assert_eq!(parsed.service, Some(Service::new("torbox", false)));
    }

    #[test]
    fn test_absent_hint_keeps_generic_service() {
        let with_service = parse(json!({
            "name": "[RD+] StreamNZB",
            "url": "https://nzb.example.com/play/1"
        }));
        assert_eq!(with_service.service, Some(Service::new("realdebrid", true)));

        let without = parse(json!({ "url": "https://nzb.example.com/play/1" }));
        assert_eq!(without.service, None);
    }

    #[test]
    fn test_malformed_hint_is_absent() {
        let parsed = parse(json!({
            "url": "https://nzb.example.com/play/1",
            "behaviorHints": { "cached": "true" }
        }));
        assert_eq!(parsed.service, None);
    }

    #[test]
    fn test_type_is_always_usenet() {
        for stream in [
            json!({ "url": "https://nzb.example.com/play/1" }),
            json!({ "infoHash": "abcdef" }),
            json!({ "ytId": "dQw4w9WgXcQ" }),
            json!({ "name": "[RD+]", "url": "https://rd.example.com/x" }),
        ] {
            assert_eq!(parse(stream).stream_type, StreamType::Usenet);
        }
    }

    #[test]
    fn test_failover_id_copied_verbatim() {
        let parsed = parse(json!({
            "url": "https://nzb.example.com/play/1",
            "failoverId": "  Group-7|a "
        }));
        assert_eq!(parsed.failover_id, Some(json!("  Group-7|a ")));

        let numeric = parse(json!({ "url": "https://nzb.example.com/play/2", "failoverId": 42 }));
        assert_eq!(numeric.failover_id, Some(json!(42)));
    }

    #[test]
    fn test_missing_failover_id_adds_no_field() {
        let parsed = parse(json!({ "url": "https://nzb.example.com/play/1" }));
        assert_eq!(parsed.failover_id, None);
        assert!(serde_json::to_value(&parsed).unwrap().get("failoverId").is_none());

        let null = parse(json!({ "url": "https://nzb.example.com/play/1", "failoverId": null }));
        assert_eq!(null.failover_id, None);
    }

    #[test]
    fn test_skip_is_propagated() {
        let stream: Stream = serde_json::from_value(json!({
            "name": "No results",
            "failoverId": "x",
            "behaviorHints": { "cached": true }
        }))
        .unwrap();
        assert!(matches!(parser().parse(&stream), ParseOutcome::Skip));
    }
}
