//! AIOStreams core
//!
//! Canonical stream model, the parser and preset extension points, and the
//! stream pipeline that ties addons to them.
//!
//! Integrations live in `aiostreams-presets` and plug in through
//! [`preset::Preset`] and [`parser::StreamParser`].

pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod preset;

pub use config::Config;
pub use dispatch::ReportDispatcher;
pub use error::{Error, Result};
pub use parser::{ParseOutcome, StreamParser};
pub use pipeline::StreamPipeline;
pub use preset::{Preset, PresetContext, PresetRegistry};
