//! Source-agnostic normalization shared by every parser

use crate::models::{Addon, ParsedStream, Service, Stream, StreamType, Torrent};
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// Service shortcodes recognised in stream names, e.g. `[RD+]`
const SERVICE_CODES: &[(&str, &str)] = &[
    ("RD", "realdebrid"),
    ("AD", "alldebrid"),
    ("PM", "premiumize"),
    ("DL", "debridlink"),
    ("ED", "easydebrid"),
    ("OC", "offcloud"),
    ("TB", "torbox"),
    ("PKP", "pikpak"),
    ("SR", "seedr"),
    ("PO", "putio"),
    ("NZBDAV", "nzbdav"),
    ("ALTMOUNT", "altmount"),
];

static SERVICE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([A-Za-z]{2,8})\s*(\+|⚡)?[^\]]*\]").expect("valid service tag regex")
});

static SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(TB|GB|MB|KB|TiB|GiB|MiB|KiB)\b").expect("valid size regex")
});

/// Generic normalization result before preset-specific classification
pub enum Normalized {
    Parsed(ParsedStream),
    Skip,
}

/// Extract source-agnostic fields from a raw stream
///
/// Skips streams without any playable target. `stream_type` is a placeholder
/// here; the parser's type classification always replaces it.
pub fn normalize(addon: &Arc<Addon>, stream: &Stream) -> Normalized {
    if !stream.has_target() {
        return Normalized::Skip;
    }

    let hints = stream.behavior_hints.clone().unwrap_or_default();
    let mut parsed = ParsedStream::new(Arc::clone(addon), StreamType::Http);

    parsed.url = non_blank(stream.url.as_deref());
    parsed.nzb_url = non_blank(stream.nzb_url.as_deref());
    parsed.external_url = non_blank(stream.external_url.as_deref());
    parsed.yt_id = non_blank(stream.yt_id.as_deref());
    parsed.torrent = non_blank(stream.info_hash.as_deref()).map(|info_hash| Torrent {
        info_hash: info_hash.to_lowercase(),
        file_idx: stream.file_idx,
    });

    let description = stream.description.as_deref().or(stream.title.as_deref());
    parsed.filename = non_blank(hints.filename.as_deref());
    parsed.size = hints.video_size.or_else(|| description.and_then(parse_size));
    parsed.binge_group = hints.binge_group;
    parsed.video_hash = hints.video_hash;
    parsed.not_web_ready = hints.not_web_ready.unwrap_or(false);
    parsed.original_name = stream.name.clone();
    parsed.original_description = description.map(str::to_string);

    Normalized::Parsed(parsed)
}

/// Detect a service from a bracketed shortcode in the stream name
///
/// `+` or `⚡` after the code marks the stream as cached.
pub fn detect_service(stream: &Stream) -> Option<Service> {
    let name = stream.name.as_deref()?;
    SERVICE_TAG.captures_iter(name).find_map(|caps| {
        let code = caps.get(1)?.as_str().to_uppercase();
        let (_, id) = SERVICE_CODES.iter().find(|(c, _)| *c == code)?;
        Some(Service::new(*id, caps.get(2).is_some()))
    })
}

/// Infer the stream kind from its targets
pub fn infer_type(stream: &Stream, service: Option<&Service>) -> StreamType {
    let has = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());

    if has(&stream.yt_id) {
        StreamType::Youtube
    } else if has(&stream.nzb_url) {
        StreamType::Usenet
    } else if has(&stream.info_hash) {
        if service.is_some() {
            StreamType::Debrid
        } else {
            StreamType::P2p
        }
    } else if has(&stream.url) {
        if service.is_some() {
            StreamType::Debrid
        } else {
            StreamType::Http
        }
    } else if has(&stream.external_url) {
        StreamType::External
    } else {
        StreamType::Error
    }
}

/// Parse a human-readable size ("1.5 GB", "700 MiB") into bytes
pub fn parse_size(text: &str) -> Option<u64> {
    let caps = SIZE.captures(text)?;
    let value: f64 = caps.get(1)?.as_str().replace(',', ".").parse().ok()?;
    let multiplier: f64 = match caps.get(2)?.as_str().to_uppercase().as_str() {
        "TB" => 1e12,
        "GB" => 1e9,
        "MB" => 1e6,
        "KB" => 1e3,
        "TIB" => 1024f64.powi(4),
        "GIB" => 1024f64.powi(3),
        "MIB" => 1024f64.powi(2),
        "KIB" => 1024.0,
        _ => return None,
    };
    Some((value * multiplier).round() as u64)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{test_addon, BehaviorHints};

    fn named(name: &str) -> Stream {
        Stream {
            name: Some(name.to_string()),
            url: Some("https://cdn.example.com/file.mkv".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_cached_service() {
        assert_eq!(
            detect_service(&named("[RD+] Torrentio\n4k")),
            Some(Service::new("realdebrid", true))
        );
        assert_eq!(
            detect_service(&named("[TB⚡] Comet")),
            Some(Service::new("torbox", true))
        );
    }

    #[test]
    fn test_detect_uncached_service() {
        assert_eq!(
            detect_service(&named("[AD download] Torrentio")),
            Some(Service::new("alldebrid", false))
        );
    }

    #[test]
    fn test_detect_unknown_code() {
        assert_eq!(detect_service(&named("[XYZ+] Something")), None);
        assert_eq!(detect_service(&named("Plain name")), None);
        assert_eq!(detect_service(&Stream::default()), None);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("💾 1.5 GB 👤 12"), Some(1_500_000_000));
        assert_eq!(parse_size("700 MB"), Some(700_000_000));
        assert_eq!(parse_size("2 GiB"), Some(2 * 1024 * 1024 * 1024));
        assert_eq!(parse_size("4,2 GB"), Some(4_200_000_000));
        assert_eq!(parse_size("no size here"), None);
    }

    #[test]
    fn test_infer_type() {
        let nzb = Stream {
            nzb_url: Some("https://x/y.nzb".to_string()),
            ..Default::default()
        };
        assert_eq!(infer_type(&nzb, None), StreamType::Usenet);

        let torrent = Stream {
            info_hash: Some("ABC".to_string()),
            ..Default::default()
        };
        assert_eq!(infer_type(&torrent, None), StreamType::P2p);
        let service = Service::new("realdebrid", true);
        assert_eq!(infer_type(&torrent, Some(&service)), StreamType::Debrid);

        assert_eq!(infer_type(&named("x"), None), StreamType::Http);
    }

    #[test]
    fn test_normalize_skips_streams_without_target() {
        let addon = Arc::new(test_addon());
        let stream = Stream {
            name: Some("info only".to_string()),
            ..Default::default()
        };
        assert!(matches!(normalize(&addon, &stream), Normalized::Skip));
    }

    #[test]
    fn test_normalize_extracts_fields() {
        let addon = Arc::new(test_addon());
        let stream = Stream {
            name: Some("Addon 1080p".to_string()),
            description: Some("Movie.2024.1080p.mkv\n💾 2 GB".to_string()),
            info_hash: Some("ABCDEF".to_string()),
            file_idx: Some(2),
            behavior_hints: Some(BehaviorHints {
                filename: Some("Movie.2024.1080p.mkv".to_string()),
                binge_group: Some("grp".to_string()),
                not_web_ready: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        let Normalized::Parsed(parsed) = normalize(&addon, &stream) else {
            panic!("stream should not be skipped");
        };
        assert_eq!(parsed.filename.as_deref(), Some("Movie.2024.1080p.mkv"));
        assert_eq!(parsed.size, Some(2_000_000_000));
        assert_eq!(parsed.torrent.as_ref().unwrap().info_hash, "abcdef");
        assert_eq!(parsed.torrent.as_ref().unwrap().file_idx, Some(2));
        assert_eq!(parsed.binge_group.as_deref(), Some("grp"));
        assert!(parsed.not_web_ready);
        assert_eq!(parsed.original_name.as_deref(), Some("Addon 1080p"));
        assert!(parsed.failover_id.is_none());
    }
}
