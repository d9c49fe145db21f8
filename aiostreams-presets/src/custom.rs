//! Custom addon preset
//!
//! Any Stremio addon given by its manifest URL. Uses the generic parser and
//! has no post-processing.

use aiostreams_core::models::{Addon, OptionDefinition, OptionType, PresetConfig, Resource, UserData};
use aiostreams_core::preset::{
    base_options, generate_addon, Preset, PresetContext, PresetMetadata, Result,
};

pub struct CustomPreset {
    metadata: PresetMetadata,
}

impl CustomPreset {
    pub const ID: &'static str = "custom";

    #[must_use]
    pub fn new(ctx: &PresetContext) -> Self {
        let timeout = ctx.defaults.default_timeout();
        let resources = [Resource::Stream];

        let mut options: Vec<OptionDefinition> = base_options("Custom", &resources, timeout, &ctx.defaults)
            .into_iter()
            .filter(|option| option.id != "url")
            .collect();
        options.push(
            OptionDefinition::new("url", "Manifest URL", OptionType::Url)
                .with_description("The manifest URL of the addon")
                .required(),
        );

        let mut metadata = PresetMetadata::new(Self::ID, "Custom", timeout);
        metadata.description = "Add any addon by its manifest URL".to_string();
        metadata.supported_resources = resources.to_vec();
        metadata.options = options;

        Self { metadata }
    }
}

impl Preset for CustomPreset {
    fn metadata(&self) -> &PresetMetadata {
        &self.metadata
    }

    fn generate_addons(&self, _user: &UserData, config: &PresetConfig) -> Result<Vec<Addon>> {
        Ok(vec![generate_addon(&self.metadata, config)])
    }
}
