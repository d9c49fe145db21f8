//! Canonical stream model shared by parsers and presets

pub mod addon;
mod lenient;
pub mod options;
pub mod parsed;
pub mod stream;

pub use addon::*;
pub use options::*;
pub use parsed::*;
pub use stream::*;

#[cfg(test)]
pub(crate) fn test_addon() -> Addon {
    Addon {
        name: "Test".to_string(),
        manifest_url: Some("https://addon.example.com/manifest.json".to_string()),
        enabled: true,
        media_types: Vec::new(),
        resources: vec![Resource::Stream],
        timeout: std::time::Duration::from_millis(5000),
        preset: PresetInstance {
            id: String::new(),
            preset_type: "test".to_string(),
            options: PresetOptions::new(),
        },
        headers: default_addon_headers(),
    }
}
