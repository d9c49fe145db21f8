use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initialize tracing for the CLI and library code
///
/// Stdout is reserved for command output, so logs go to stderr unless a log
/// file is configured. `format` picks JSON lines or pretty multi-line events.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let log_level = parse_log_level(&config.level)?;

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let output = LogOutput::open(config)?;
    let ansi = output.is_stderr();
    let registry = tracing_subscriber::registry().with(env_filter);

    if config.format.as_str() == "json" {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_line_number(true)
            .with_writer(output.into_make_writer());
        registry.with(json_layer).try_init()?;
    } else {
        let pretty_layer = fmt::layer()
            .pretty()
            .with_target(true)
            .with_line_number(true)
            .with_file(false)
            .with_ansi(ansi)
            .with_writer(output.into_make_writer());
        registry.with(pretty_layer).try_init()?;
    }

    Ok(())
}

/// Where log events are written
#[derive(Debug)]
enum LogOutput {
    Stderr,
    File(std::fs::File),
}

impl LogOutput {
    fn open(config: &LoggingConfig) -> std::io::Result<Self> {
        match &config.file_path {
            Some(path) => std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map(Self::File),
            None => Ok(Self::Stderr),
        }
    }

    const fn is_stderr(&self) -> bool {
        matches!(self, Self::Stderr)
    }

    fn into_make_writer(self) -> BoxMakeWriter {
        match self {
            Self::Stderr => BoxMakeWriter::new(std::io::stderr),
            Self::File(file) => BoxMakeWriter::new(Arc::new(file)),
        }
    }
}

/// Parse log level string to tracing Level
fn parse_log_level(level: &str) -> anyhow::Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(anyhow::anyhow!("Invalid log level: {level}")),
    }
}
