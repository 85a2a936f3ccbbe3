//! Typed configuration for the tag parser

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::tags::errors::TagError;

/// Output encodings supported by the serializer.
///
/// Parsing a flag value through [`FromStr`] is the single validation
/// point for the format enum; once a config holds an `OutputFormat` the
/// serializer has no invalid case left to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Newline-delimited `KEY=value` lines, for shell env consumption.
    #[default]
    Raw,
    /// A single JSON object.
    Json,
}

impl OutputFormat {
    /// Allowed flag spellings, sorted for help text.
    pub const ALLOWED: [&'static str; 2] = ["json", "raw"];
}

impl FromStr for OutputFormat {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "json" => Ok(Self::Json),
            other => Err(TagError::UnsupportedFormat { value: other.to_string() }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Configuration for tag selection, coercion, and output.
///
/// Key names in the three typed sets are uppercase; extracted keys are
/// normalized to uppercase before they are compared against these sets.
/// A key should appear in at most one set. Keys in none of them fall
/// back to single-value, last-wins strings.
#[derive(Debug, Clone, Default)]
pub struct TagConfig {
    /// Keys that always serialize as arrays, even with a single value.
    pub array_tags: BTreeSet<String>,
    /// Keys that serialize as plain strings.
    pub string_tags: BTreeSet<String>,
    /// Keys whose last value is coerced to a boolean.
    pub bool_tags: BTreeSet<String>,
    /// Emit every extracted key instead of only the configured ones.
    pub output_all: bool,
    /// Output encoding.
    pub format: OutputFormat,
    /// Indent the JSON object. No effect on raw output.
    pub pretty_print: bool,
}

impl TagConfig {
    /// Whether a key participates in the output at all.
    pub fn is_selected(&self, key: &str) -> bool {
        self.output_all
            || self.array_tags.contains(key)
            || self.string_tags.contains(key)
            || self.bool_tags.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(" JSON ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_format_rejects_unknown_values() {
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn test_selection_with_output_all() {
        let config = TagConfig { output_all: true, ..Default::default() };
        assert!(config.is_selected("ANYTHING"));
    }

    #[test]
    fn test_selection_from_typed_sets() {
        let config = TagConfig {
            array_tags: BTreeSet::from(["TAG_A".to_string()]),
            bool_tags: BTreeSet::from(["TAG_B".to_string()]),
            ..Default::default()
        };
        assert!(config.is_selected("TAG_A"));
        assert!(config.is_selected("TAG_B"));
        assert!(!config.is_selected("TAG_C"));
    }
}
