//! Tag extraction and typed serialization
//!
//! Scans free-form text (pull request descriptions, issue bodies) for
//! line-anchored `KEY=VALUE` tags and re-serializes them as raw lines or
//! a JSON object, applying per-key type coercion and a duplicate-key
//! policy. The whole pipeline is pure and synchronous: text in, string
//! out, nothing shared between invocations.

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod matcher;
pub mod serializer;
pub mod value;

use std::collections::BTreeMap;

pub use config::{OutputFormat, TagConfig};
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use errors::TagError;
pub use matcher::TagGroups;
pub use value::TagValue;

/// Extracts tags from text and serializes them per its configuration.
#[derive(Debug, Clone, Default)]
pub struct TagParser {
    config: TagConfig,
}

impl TagParser {
    /// Create a new tag parser. The format enum is validated by
    /// construction of the config, so there is nothing left to check
    /// here.
    pub fn new(config: TagConfig) -> Self {
        Self { config }
    }

    /// Extract tags from `text` and serialize them, reporting non-fatal
    /// diagnostics through `sink`.
    ///
    /// Fatal errors (bool coercion) abort the whole parse; no partial
    /// output is produced.
    pub fn parse(&self, text: &str, sink: &mut dyn DiagnosticSink) -> Result<String, TagError> {
        let groups = matcher::match_tags(text, sink);
        let mut selected = BTreeMap::new();
        for (key, values) in groups.iter() {
            if !self.config.is_selected(key) {
                continue;
            }
            let coerced = value::coerce(&self.config, key, values, sink)?;
            selected.insert(key.to_string(), coerced);
        }
        serializer::serialize(&self.config, &selected)
    }

    /// Like [`TagParser::parse`], with diagnostics forwarded to the
    /// tracing subscriber.
    pub fn parse_logged(&self, text: &str) -> Result<String, TagError> {
        self.parse(text, &mut TracingSink)
    }
}
