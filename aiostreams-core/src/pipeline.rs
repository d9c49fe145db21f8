// Stream Pipeline
//
// fetch (per addon, concurrently) -> parse (per stream, synchronous)
// -> on_streams_ready (once per preset with that preset's whole batch)

use crate::endpoint;
use crate::error::{Error, Result};
use crate::http::{HttpSender, RequestOptions};
use crate::models::{Addon, MediaType, ParsedStream, Resource, Stream};
use crate::preset::{ConfiguredAddon, Preset};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Fetches raw streams from an addon's stream resource
#[derive(Clone)]
pub struct AddonClient {
    http: Arc<dyn HttpSender>,
}

impl AddonClient {
    #[must_use]
    pub fn new(http: Arc<dyn HttpSender>) -> Self {
        Self { http }
    }

    /// `<base>/stream/<type>/<id>.json` for an addon
    pub fn stream_url(addon: &Addon, media_type: MediaType, id: &str) -> Result<Url> {
        let manifest_url = addon
            .manifest_url
            .as_deref()
            .ok_or_else(|| Error::MissingManifestUrl(addon.name.clone()))?;

        let invalid = |reason: String| Error::InvalidManifestUrl {
            addon: addon.name.clone(),
            reason,
        };

        let mut url = Url::parse(&endpoint::trim_manifest_url(manifest_url))
            .map_err(|e| invalid(e.to_string()))?;
        url.set_query(None);
        url.set_fragment(None);
        let file = format!("{id}.json");
        url.path_segments_mut()
            .map_err(|()| invalid(format!("{manifest_url} cannot have a path")))?
            .pop_if_empty()
            .extend(["stream", media_type.as_str(), file.as_str()]);
        Ok(url)
    }

    /// Fetch raw streams
    ///
    /// Elements that are not stream objects are dropped.
    pub async fn fetch_streams(
        &self,
        addon: &Addon,
        media_type: MediaType,
        id: &str,
    ) -> Result<Vec<Stream>> {
        let url = Self::stream_url(addon, media_type, id)?;
        let options = RequestOptions::get(addon.timeout).with_headers(&addon.headers);

        let response = self.http.send(&url, options).await?;
        let body: Value = response.json()?;
        let items = match body.get("streams") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(_) => {
                return Err(Error::InvalidResponse(format!(
                    "{}: \"streams\" is not a list",
                    addon.name
                )))
            }
        };

        let mut streams = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match serde_json::from_value::<Stream>(item.clone()) {
                Ok(stream) => streams.push(stream),
                Err(e) => warn!(addon = %addon.name, index, error = %e, "Dropping malformed stream"),
            }
        }
        Ok(streams)
    }
}

/// Normalize one addon's raw streams
#[must_use]
pub fn normalize(preset: &dyn Preset, addon: &Arc<Addon>, raw: &[Stream]) -> Vec<ParsedStream> {
    let parsed = preset.parser(Arc::clone(addon)).parse_all(raw);
    debug!(
        addon = %addon.name,
        raw = raw.len(),
        parsed = parsed.len(),
        skipped = raw.len() - parsed.len(),
        "Normalized streams"
    );
    parsed
}

/// Runs the stream resource path for a set of configured addons
#[derive(Clone)]
pub struct StreamPipeline {
    client: AddonClient,
}

impl StreamPipeline {
    #[must_use]
    pub fn new(http: Arc<dyn HttpSender>) -> Self {
        Self {
            client: AddonClient::new(http),
        }
    }

    /// Fetch, normalize and post-process streams for one title
    ///
    /// Addons that fail to respond are logged and left out. Each preset's
    /// hook sees the combined batch of its addons, in addon order.
    pub async fn run(
        &self,
        addons: &[ConfiguredAddon],
        media_type: MediaType,
        id: &str,
    ) -> Vec<ParsedStream> {
        let eligible: Vec<&ConfiguredAddon> = addons
            .iter()
            .filter(|c| c.addon.supports(Resource::Stream))
            .filter(|c| c.addon.media_types.is_empty() || c.addon.media_types.contains(&media_type))
            .collect();

        let fetched = join_all(eligible.iter().map(|configured| async move {
            let result = self
                .client
                .fetch_streams(&configured.addon, media_type, id)
                .await;
            (*configured, result)
        }))
        .await;

        // Batches grouped by preset id, in first-seen order
        let mut batches: Vec<(Arc<dyn Preset>, Vec<ParsedStream>)> = Vec::new();
        for (configured, result) in fetched {
            let raw = match result {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(addon = %configured.addon.name, error = %e, "Failed to fetch streams");
                    continue;
                }
            };

            let parsed = normalize(configured.preset.as_ref(), &configured.addon, &raw);
            let preset_id = &configured.preset.metadata().id;
            match batches
                .iter_mut()
                .find(|(preset, _)| &preset.metadata().id == preset_id)
            {
                Some((_, batch)) => batch.extend(parsed),
                None => batches.push((Arc::clone(&configured.preset), parsed)),
            }
        }

        let mut all = Vec::new();
        for (preset, batch) in batches {
            preset.on_streams_ready(&batch);
            all.extend(batch);
        }

        info!(
            media_type = media_type.as_str(),
            id,
            addons = eligible.len(),
            streams = all.len(),
            "Stream request completed"
        );
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_addon_headers, PresetInstance, PresetOptions};
    use std::time::Duration;

    fn addon(manifest_url: Option<&str>) -> Addon {
        Addon {
            name: "Test".to_string(),
            manifest_url: manifest_url.map(str::to_string),
            enabled: true,
            media_types: Vec::new(),
            resources: vec![Resource::Stream],
            timeout: Duration::from_secs(5),
            preset: PresetInstance {
                id: String::new(),
                preset_type: "test".to_string(),
                options: PresetOptions::new(),
            },
            headers: default_addon_headers(),
        }
    }

    #[test]
    fn test_stream_url() {
        let url = AddonClient::stream_url(
            &addon(Some("https://addon.example.com/cfg/manifest.json")),
            MediaType::Series,
            "tt0944947:1:2",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://addon.example.com/cfg/stream/series/tt0944947:1:2.json"
        );
    }

    #[test]
    fn test_stream_url_root_manifest() {
        let url = AddonClient::stream_url(
            &addon(Some("https://addon.example.com/manifest.json")),
            MediaType::Movie,
            "tt1",
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://addon.example.com/stream/movie/tt1.json");
    }

    #[test]
    fn test_stream_url_requires_manifest() {
        assert!(matches!(
            AddonClient::stream_url(&addon(None), MediaType::Movie, "tt1"),
            Err(Error::MissingManifestUrl(_))
        ));
    }

    #[test]
    fn test_stream_url_rejects_unusable_manifest() {
        let err = AddonClient::stream_url(&addon(Some("not a url")), MediaType::Movie, "tt1")
            .unwrap_err();
        assert!(matches!(
            &err,
            Error::InvalidManifestUrl { addon, .. } if addon == "Test"
        ));

        let err = AddonClient::stream_url(
            &addon(Some("mailto:someone@example.com")),
            MediaType::Movie,
            "tt1",
        )
        .unwrap_err();
        match err {
            Error::InvalidManifestUrl { reason, .. } => {
                assert!(reason.contains("cannot have a path"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
