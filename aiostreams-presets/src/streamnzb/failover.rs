//! Failover order reporting
//!
//! After a batch is normalized, StreamNZB is told the order its streams are
//! presented in so it can reorder its own failover candidates. One
//! `POST <base>/failover_order` per origin instance, detached and best-effort.

use aiostreams_core::dispatch::ReportDispatcher;
use aiostreams_core::endpoint;
use aiostreams_core::http::{HttpError, HttpSender, RequestOptions, USER_AGENT};
use aiostreams_core::models::{Addon, ParsedStream};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const FAILOVER_ORDER_PATH: &str = "/failover_order";

pub const REPORT_TIMEOUT: Duration = Duration::from_millis(5000);

const REPORT_FAILURE: &str = "Failed to report failover order to StreamNZB";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no usable endpoint for addon {0}")]
    NoEndpoint(String),

    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct FailoverOrder<'a> {
    streams: Vec<FailoverEntry<'a>>,
}

/// Entries without an id serialize as `{}` and still hold their position.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FailoverEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    failover_id: Option<&'a Value>,
}

/// Group streams by origin manifest URL (empty key when absent)
///
/// Groups come out in first-seen order and keep the input order inside.
#[must_use]
pub fn partition_by_manifest(streams: &[ParsedStream]) -> Vec<(&str, Vec<&ParsedStream>)> {
    let mut groups: Vec<(&str, Vec<&ParsedStream>)> = Vec::new();
    for stream in streams {
        let key = stream.addon.manifest_key();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(stream),
            None => groups.push((key, vec![stream])),
        }
    }
    groups
}

/// Base URL of the StreamNZB instance behind `addon`
///
/// The configured `url` option wins (manifest suffix and trailing slashes
/// removed); otherwise the manifest URL is parsed.
pub fn instance_base(addon: &Addon) -> Result<String, ReportError> {
    if let Some(configured) = addon.option_str("url") {
        let base = endpoint::trim_manifest_url(configured);
        if !base.is_empty() {
            return Ok(base);
        }
    }

    let manifest_url = addon
        .manifest_url
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ReportError::NoEndpoint(addon.name.clone()))?;

    endpoint::base_from_manifest_url(manifest_url).map_err(|e| ReportError::InvalidEndpoint {
        endpoint: manifest_url.to_string(),
        reason: e.to_string(),
    })
}

/// `<base>/failover_order` for `addon`
pub fn report_endpoint(addon: &Addon) -> Result<Url, ReportError> {
    let base = instance_base(addon)?;
    endpoint::join(&base, FAILOVER_ORDER_PATH).map_err(|e| ReportError::InvalidEndpoint {
        endpoint: base,
        reason: e.to_string(),
    })
}

/// Request body listing each stream's failover id in presentation order
pub fn report_body(streams: &[&ParsedStream]) -> Result<String, ReportError> {
    let order = FailoverOrder {
        streams: streams
            .iter()
            .map(|s| FailoverEntry {
                failover_id: s.failover_id.as_ref(),
            })
            .collect(),
    };
    Ok(serde_json::to_string(&order)?)
}

/// Sends failover order reports for one instance partition at a time
#[derive(Clone)]
pub struct FailoverReporter {
    http: Arc<dyn HttpSender>,
    dispatcher: ReportDispatcher,
}

impl FailoverReporter {
    #[must_use]
    pub fn new(http: Arc<dyn HttpSender>, dispatcher: ReportDispatcher) -> Self {
        Self { http, dispatcher }
    }

    /// Build the report request for a partition (all streams share one addon)
    pub fn build_request(streams: &[&ParsedStream]) -> Result<Option<(Url, RequestOptions)>, ReportError> {
        let Some(first) = streams.first() else {
            return Ok(None);
        };

        let url = report_endpoint(&first.addon)?;
        let options = RequestOptions::post_json(report_body(streams)?, REPORT_TIMEOUT)
            .with_header("User-Agent", USER_AGENT)
            .discard_body();
        Ok(Some((url, options)))
    }

    /// Report one partition without waiting for the outcome
    pub fn report(&self, streams: &[&ParsedStream]) {
        let (url, options) = match Self::build_request(streams) {
            Ok(Some(request)) => request,
            Ok(None) => return,
            Err(e) => {
                debug!(error = %e, "{REPORT_FAILURE}: {e}");
                return;
            }
        };

        debug!(url = %url, streams = streams.len(), "Reporting failover order");
        let http = Arc::clone(&self.http);
        self.dispatcher.detach(REPORT_FAILURE, async move {
            http.send(&url, options)
                .await
                .map(|_| ())
                .map_err(ReportError::from)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiostreams_core::http::Method;
    use aiostreams_core::models::{
        default_addon_headers, PresetInstance, PresetOptions, Resource, StreamType,
    };
    use serde_json::json;

    fn addon(url_option: Option<&str>, manifest_url: Option<&str>) -> Arc<Addon> {
        let mut options = PresetOptions::new();
        if let Some(url) = url_option {
            options.insert("url".to_string(), json!(url));
        }
        Arc::new(Addon {
            name: "StreamNZB".to_string(),
            manifest_url: manifest_url.map(str::to_string),
            enabled: true,
            media_types: Vec::new(),
            resources: vec![Resource::Stream],
            timeout: Duration::from_secs(15),
            preset: PresetInstance {
                id: String::new(),
                preset_type: "streamnzb".to_string(),
                options,
            },
            headers: default_addon_headers(),
        })
    }

    fn stream(addon: &Arc<Addon>, failover_id: Option<&str>) -> ParsedStream {
        let mut parsed = ParsedStream::new(Arc::clone(addon), StreamType::Usenet);
        parsed.failover_id = failover_id.map(|id| json!(id));
        parsed
    }

    #[test]
    fn test_endpoint_from_configured_url_with_query() {
        let addon = addon(Some("https://host/dir/manifest.json?x=1"), None);
        assert_eq!(
            report_endpoint(&addon).unwrap().as_str(),
            "https://host/dir/failover_order"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slashes() {
        let addon = addon(Some("https://nzb.example.com///"), None);
        assert_eq!(
            report_endpoint(&addon).unwrap().as_str(),
            "https://nzb.example.com/failover_order"
        );
    }

    #[test]
    fn test_endpoint_falls_back_to_manifest_url() {
        let from_manifest = addon(None, Some("https://nzb.example.com/cfg/Manifest.json"));
        assert_eq!(
            report_endpoint(&from_manifest).unwrap().as_str(),
            "https://nzb.example.com/cfg/failover_order"
        );

        let blank_option = addon(Some("  "), Some("https://nzb.example.com/manifest.json"));
        assert_eq!(
            report_endpoint(&blank_option).unwrap().as_str(),
            "https://nzb.example.com/failover_order"
        );
    }

    #[test]
    fn test_endpoint_unavailable() {
        assert!(matches!(
            report_endpoint(&addon(None, None)),
            Err(ReportError::NoEndpoint(_))
        ));
        assert!(matches!(
            report_endpoint(&addon(None, Some("nzb.example.com"))),
            Err(ReportError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            report_endpoint(&addon(Some("not a url"), None)),
            Err(ReportError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_body_keeps_positions_of_missing_ids() {
        let addon = addon(Some("https://nzb.example.com"), None);
        let streams = [stream(&addon, Some("a")), stream(&addon, None), stream(&addon, Some("c"))];
        let refs: Vec<&ParsedStream> = streams.iter().collect();

        let body: Value = serde_json::from_str(&report_body(&refs).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({ "streams": [{ "failoverId": "a" }, {}, { "failoverId": "c" }] })
        );
    }

    #[test]
    fn test_partition_by_manifest_preserves_order() {
        let a = addon(None, Some("https://a.example.com/manifest.json"));
        let b = addon(None, Some("https://b.example.com/manifest.json"));
        let none = addon(None, None);
        let streams = vec![
            stream(&a, Some("a1")),
            stream(&b, Some("b1")),
            stream(&none, Some("n1")),
            stream(&a, Some("a2")),
        ];

        let groups = partition_by_manifest(&streams);
        let summary: Vec<(&str, Vec<Option<&Value>>)> = groups
            .iter()
            .map(|(key, group)| (*key, group.iter().map(|s| s.failover_id.as_ref()).collect()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("https://a.example.com/manifest.json", vec![Some(&json!("a1")), Some(&json!("a2"))]),
                ("https://b.example.com/manifest.json", vec![Some(&json!("b1"))]),
                ("", vec![Some(&json!("n1"))]),
            ]
        );
    }

    #[test]
    fn test_build_request() {
        let addon = addon(Some("https://nzb.example.com/manifest.json"), None);
        let streams = [stream(&addon, Some("x"))];
        let refs: Vec<&ParsedStream> = streams.iter().collect();

        let (url, options) = FailoverReporter::build_request(&refs).unwrap().unwrap();
        assert_eq!(url.as_str(), "https://nzb.example.com/failover_order");
        assert_eq!(options.method, Method::POST);
        assert_eq!(options.timeout, Duration::from_millis(5000));
        assert_eq!(options.headers.get("User-Agent").map(String::as_str), Some("AIOStreams"));
        assert_eq!(
            options.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(options.body.as_deref(), Some(r#"{"streams":[{"failoverId":"x"}]}"#));
        assert!(!options.read_body);

        assert!(FailoverReporter::build_request(&[]).unwrap().is_none());
    }
}
