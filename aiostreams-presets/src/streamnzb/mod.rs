//! StreamNZB preset
//!
//! Streams usenet content over NNTP from a self-hosted StreamNZB instance.
//! The instance URL is required. After each batch the instance is told the
//! final stream order (see [`failover`]).

pub mod failover;
pub mod parser;

pub use failover::{FailoverReporter, ReportError, FAILOVER_ORDER_PATH};
pub use parser::StreamNzbParser;

use aiostreams_core::models::{
    Addon, OptionDefinition, OptionType, ParsedStream, PresetConfig, Resource, SocialKind,
    SocialLink, StreamType, UserData,
};
use aiostreams_core::parser::StreamParser;
use aiostreams_core::preset::{
    base_options, generate_addon, Preset, PresetCategory, PresetContext, PresetMetadata, Result,
};
use std::sync::Arc;
use tracing::debug;

const LOGO: &str =
    "https://cdn.discordapp.com/icons/1470288400157380710/6f397b4a2e9561dc7ad43526588cfd67.png";
const DONATE_URL: &str = "https://buymeacoffee.com/gaisberg";

pub struct StreamNzbPreset {
    metadata: PresetMetadata,
    reporter: FailoverReporter,
}

impl StreamNzbPreset {
    pub const ID: &'static str = "streamnzb";
    pub const NAME: &'static str = "StreamNZB";

    #[must_use]
    pub fn new(ctx: &PresetContext) -> Self {
        Self {
            metadata: Self::build_metadata(ctx),
            reporter: FailoverReporter::new(Arc::clone(&ctx.http), ctx.dispatcher.clone()),
        }
    }

    fn build_metadata(ctx: &PresetContext) -> PresetMetadata {
        let timeout = ctx.defaults.default_timeout();
        let resources = [Resource::Stream];

        let mut options: Vec<OptionDefinition> =
            base_options(Self::NAME, &resources, timeout, &ctx.defaults)
                .into_iter()
                .filter(|option| option.id != "url")
                .collect();
        options.push(
            OptionDefinition::new("url", "Instance URL", OptionType::Url)
                .with_description(
                    "Base URL of your StreamNZB instance (e.g. https://streamnzb.example.com)",
                )
                .required(),
        );
        options.push(
            OptionDefinition::new("socials", "", OptionType::Socials).with_socials(vec![
                SocialLink {
                    id: SocialKind::Donate,
                    url: DONATE_URL.to_string(),
                },
            ]),
        );

        let mut metadata = PresetMetadata::new(Self::ID, Self::NAME, timeout);
        metadata.description = "Stream via nntp without any additional services, availability \
                                checks, failover supports aiostreams builtins."
            .to_string();
        metadata.logo = Some(LOGO.to_string());
        metadata.supported_resources = resources.to_vec();
        metadata.supported_stream_types = vec![StreamType::Usenet];
        metadata.category = PresetCategory::Streams;
        metadata.options = options;
        metadata
    }
}

impl Preset for StreamNzbPreset {
    fn metadata(&self) -> &PresetMetadata {
        &self.metadata
    }

    fn generate_addons(&self, _user: &UserData, config: &PresetConfig) -> Result<Vec<Addon>> {
        Ok(vec![generate_addon(&self.metadata, config)])
    }

    fn parser(&self, addon: Arc<Addon>) -> Box<dyn StreamParser> {
        Box::new(StreamNzbParser::new(addon))
    }

    fn on_streams_ready(&self, streams: &[ParsedStream]) {
        if streams.is_empty() {
            return;
        }

        for (manifest, partition) in failover::partition_by_manifest(streams) {
            debug!(manifest, streams = partition.len(), "Dispatching failover order report");
            self.reporter.report(&partition);
        }
    }
}
