//! Addon endpoint derivation from configured and manifest URLs

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static MANIFEST_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/manifest\.json.*$").expect("valid manifest suffix regex")
});

static MANIFEST_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/manifest\.json$").expect("valid manifest path regex")
});

/// Strip a `/manifest.json...` suffix (query included) and trailing slashes
///
/// `https://host/dir/manifest.json?x=1` becomes `https://host/dir`.
#[must_use]
pub fn trim_manifest_url(raw: &str) -> String {
    let trimmed = MANIFEST_SUFFIX.replace(raw.trim(), "");
    trimmed.trim_end_matches('/').to_string()
}

/// Base URL of an addon derived by parsing its manifest URL
///
/// The `/manifest.json` path segment is removed, the path defaults to `/`,
/// query and fragment are dropped and trailing slashes trimmed.
pub fn base_from_manifest_url(manifest_url: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(manifest_url.trim())?;
    let path = MANIFEST_PATH.replace(url.path(), "").into_owned();
    url.set_path(if path.is_empty() { "/" } else { &path });
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Join a base URL and an absolute path into a parsed URL
pub fn join(base: &str, path: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}{path}", base.trim_end_matches('/')))
}
