//! Non-fatal diagnostics emitted during extraction
//!
//! Diagnostics are observational and never block output. They go to a
//! caller-supplied sink so the engine carries no ambient global state;
//! the CLI uses [`TracingSink`], tests accumulate into a `Vec`.

use tracing::warn;

/// Observational events produced while extracting and coercing tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A regex match came back without the expected capture groups.
    /// The matcher's own grammar should never produce this.
    MalformedMatch { matched: String },
    /// A key not declared as an array tag carried more than one value;
    /// the last value wins.
    DuplicateKeyNotArray { key: String, count: usize },
}

/// Caller-supplied sink for non-fatal diagnostics.
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Sink that forwards diagnostics to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::MalformedMatch { matched } => {
                warn!(matched = %matched, "unable to parse tag line");
            }
            Diagnostic::DuplicateKeyNotArray { key, count } => {
                warn!(
                    key = %key,
                    count,
                    "encountered duplicate values for a key not in array tags, taking the last value"
                );
            }
        }
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
