// Stream Parser
//
// Converts one raw stream into one normalized stream, or skips it.
//
// `StreamParser::parse` runs the generic normalization and then the three
// override points in order: service, type, failover id. Presets customise
// parsing by implementing the override points on their own parser and
// delegating the rest to the `generic` helpers.

pub mod generic;

use crate::models::{Addon, ParsedStream, Service, Stream, StreamType};
use generic::Normalized;
use serde_json::Value;
use std::sync::Arc;

/// Result of parsing one raw stream
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Parsed(Box<ParsedStream>),
    /// The stream is not presented
    Skip,
}

impl ParseOutcome {
    #[must_use]
    pub fn into_parsed(self) -> Option<ParsedStream> {
        match self {
            Self::Parsed(parsed) => Some(*parsed),
            Self::Skip => None,
        }
    }

    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }
}

/// Per-addon stream parser
///
/// Parsing is synchronous, performs no I/O and never fails: malformed hints are
/// treated as absent.
pub trait StreamParser: Send + Sync {
    /// Addon whose streams this parser normalizes
    fn addon(&self) -> &Arc<Addon>;

    /// Normalize a raw stream
    fn parse(&self, stream: &Stream) -> ParseOutcome {
        let mut parsed = match generic::normalize(self.addon(), stream) {
            Normalized::Parsed(parsed) => parsed,
            Normalized::Skip => return ParseOutcome::Skip,
        };

        parsed.service = self.classify_service(stream, &parsed);
        parsed.stream_type = self.classify_type(stream, parsed.service.as_ref(), &parsed);
        if let Some(failover_id) = self.extract_failover_id(stream) {
            parsed.failover_id = Some(failover_id);
        }

        ParseOutcome::Parsed(Box::new(parsed))
    }

    /// Service and cache state of the stream
    fn classify_service(&self, stream: &Stream, _current: &ParsedStream) -> Option<Service> {
        generic::detect_service(stream)
    }

    /// Stream kind
    fn classify_type(
        &self,
        stream: &Stream,
        service: Option<&Service>,
        _current: &ParsedStream,
    ) -> StreamType {
        generic::infer_type(stream, service)
    }

    /// Source-specific correlation token, if the source emits one
    fn extract_failover_id(&self, _stream: &Stream) -> Option<Value> {
        None
    }

    /// Parse a batch, dropping skipped streams and keeping input order
    fn parse_all(&self, streams: &[Stream]) -> Vec<ParsedStream> {
        streams
            .iter()
            .filter_map(|stream| self.parse(stream).into_parsed())
            .collect()
    }
}

/// Parser that applies only the generic behaviour
pub struct DefaultStreamParser {
    addon: Arc<Addon>,
}

impl DefaultStreamParser {
    #[must_use]
    pub const fn new(addon: Arc<Addon>) -> Self {
        Self { addon }
    }
}

impl StreamParser for DefaultStreamParser {
    fn addon(&self) -> &Arc<Addon> {
        &self.addon
    }
}
