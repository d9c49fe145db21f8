use aiostreams_core::http::{HttpSender, ReqwestSender};
use aiostreams_core::models::{MediaType, UserData};
use aiostreams_core::{logging, Config, PresetContext, ReportDispatcher, StreamPipeline};
use aiostreams_presets::builtin_registry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How long detached reports may keep the process alive after output
const REPORT_DRAIN_DEADLINE: Duration = Duration::from_secs(6);

#[derive(Parser, Debug)]
#[command(name = "aiostreams")]
#[command(about = "Aggregate and normalize streams from addon presets", long_about = None)]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, env = "AIOSTREAMS_CONFIG_FILE", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the metadata and option schema of every built-in preset
    Schema,

    /// Fetch, normalize and report streams for one title
    Streams {
        /// User configuration (JSON with a `presets` list)
        #[arg(short, long)]
        user: PathBuf,

        /// Media type (movie, series, anime, channel, tv)
        #[arg(short = 't', long = "type", default_value = "movie")]
        media_type: String,

        /// Title id, e.g. tt0111161 or tt0903747:1:1
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    if let Err(errors) = config.validate() {
        for e in &errors {
            eprintln!("Config validation error: {e}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s)",
            errors.len()
        ));
    }

    logging::init_logging(&config.logging)?;

    let http: Arc<dyn HttpSender> = Arc::new(ReqwestSender::from_config(&config.http)?);
    let dispatcher = ReportDispatcher::new();
    let ctx = PresetContext::new(Arc::clone(&http), dispatcher.clone(), config.presets);
    let registry = builtin_registry(&ctx)?;
    info!(presets = registry.len(), "Preset registry ready");

    match args.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&registry.list())?);
        }
        Command::Streams {
            user,
            media_type,
            id,
        } => {
            let media_type: MediaType = serde_json::from_value(Value::String(media_type.clone()))
                .with_context(|| format!("Unknown media type: {media_type}"))?;

            let raw = std::fs::read_to_string(&user)
                .with_context(|| format!("Failed to read {}", user.display()))?;
            let user: UserData = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid user configuration in {}", user.display()))?;

            let addons = registry.build_user_addons(&user)?;
            info!(addons = addons.len(), "Addons configured");

            let streams = StreamPipeline::new(http).run(&addons, media_type, &id).await;
            println!("{}", serde_json::to_string_pretty(&streams)?);

            if !dispatcher.drain(REPORT_DRAIN_DEADLINE).await {
                warn!(
                    pending = dispatcher.pending(),
                    "Exiting with reports still in flight"
                );
            }
        }
    }

    Ok(())
}
