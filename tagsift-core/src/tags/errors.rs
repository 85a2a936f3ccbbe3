//! Error types for tag extraction and serialization

use thiserror::Error;

/// Fatal errors produced while extracting or serializing tags.
///
/// Non-fatal conditions (malformed matches, duplicate keys outside the
/// array set) are reported through a [`crate::tags::DiagnosticSink`]
/// instead and never surface here.
#[derive(Debug, Error)]
pub enum TagError {
    /// The output format had a value outside the allowed set.
    #[error("unsupported output format '{value}', allowed values are [\"json\", \"raw\"]")]
    UnsupportedFormat { value: String },

    /// A bool-declared tag carried a value that is not a boolean literal.
    #[error("failed to parse value '{value}' of tag {key} as bool")]
    BoolCoercion { key: String, value: String },

    /// The JSON encoder failed. Unreachable with string keys and
    /// string/bool/array values, kept so the serializer never panics.
    #[error("failed to encode tags as json")]
    JsonEncode {
        #[from]
        source: serde_json::Error,
    },
}
