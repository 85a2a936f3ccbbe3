//! Typed tag values and coercion rules

use serde::Serialize;

use crate::tags::config::TagConfig;
use crate::tags::diagnostics::{Diagnostic, DiagnosticSink};
use crate::tags::errors::TagError;

/// The coerced representation of one tag key selected for output.
///
/// The serializer dispatches on this tag; there is no runtime type
/// inspection anywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    String(String),
    Bool(bool),
    Array(Vec<String>),
}

/// Coerce one key's ordered values into its output shape.
///
/// Array tags keep the full sequence even when it has a single element.
/// Everything else takes the last value in encounter order; bool tags
/// additionally parse it as a boolean literal, which is the one fatal
/// path here.
pub fn coerce(
    config: &TagConfig,
    key: &str,
    values: &[String],
    sink: &mut dyn DiagnosticSink,
) -> Result<TagValue, TagError> {
    if config.array_tags.contains(key) {
        return Ok(TagValue::Array(values.to_vec()));
    }
    if values.len() > 1 {
        sink.emit(Diagnostic::DuplicateKeyNotArray {
            key: key.to_string(),
            count: values.len(),
        });
    }
    let last = values.last().cloned().unwrap_or_default();
    if config.string_tags.contains(key) {
        return Ok(TagValue::String(last));
    }
    if config.bool_tags.contains(key) {
        return Ok(TagValue::Bool(parse_bool(key, &last)?));
    }
    Ok(TagValue::String(last))
}

/// Boolean literal forms accepted for bool tags, case-insensitively
/// after trimming surrounding whitespace.
fn parse_bool(key: &str, value: &str) -> Result<bool, TagError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "y" => Ok(true),
        "0" | "f" | "false" | "no" | "n" => Ok(false),
        _ => Err(TagError::BoolCoercion { key: key.to_string(), value: value.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn config_with(array: &[&str], string: &[&str], boolean: &[&str]) -> TagConfig {
        TagConfig {
            array_tags: array.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            string_tags: string.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            bool_tags: boolean.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            ..Default::default()
        }
    }

    fn values(vs: &[&str]) -> Vec<String> {
        vs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_array_tag_keeps_all_values() {
        let config = config_with(&["K"], &[], &[]);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let got = coerce(&config, "K", &values(&["a", "b", "c"]), &mut sink).unwrap();
        assert_eq!(got, TagValue::Array(values(&["a", "b", "c"])));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_array_tag_with_single_value_stays_array() {
        let config = config_with(&["K"], &[], &[]);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let got = coerce(&config, "K", &values(&["only"]), &mut sink).unwrap();
        assert_eq!(got, TagValue::Array(values(&["only"])));
    }

    #[test]
    fn test_untyped_key_takes_last_value() {
        let config = TagConfig::default();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let got = coerce(&config, "K", &values(&["a", "b", "c"]), &mut sink).unwrap();
        assert_eq!(got, TagValue::String("c".to_string()));
        assert_eq!(
            sink,
            vec![Diagnostic::DuplicateKeyNotArray { key: "K".to_string(), count: 3 }]
        );
    }

    #[test]
    fn test_string_tag_is_verbatim() {
        let config = config_with(&[], &["K"], &[]);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let got = coerce(&config, "K", &values(&["  Yes  "]), &mut sink).unwrap();
        assert_eq!(got, TagValue::String("  Yes  ".to_string()));
    }

    #[test]
    fn test_bool_tag_coercion_table() {
        let config = config_with(&[], &[], &["K"]);
        let cases = [
            ("yes", true),
            ("0", false),
            ("FALSE", false),
            ("True", true),
            ("t", true),
            ("y", true),
            ("n", false),
            ("no", false),
            ("1", true),
            (" TRUE ", true),
        ];
        for (raw, want) in cases {
            let mut sink: Vec<Diagnostic> = Vec::new();
            let got = coerce(&config, "K", &values(&[raw]), &mut sink).unwrap();
            assert_eq!(got, TagValue::Bool(want), "input {raw:?}");
        }
    }

    #[test]
    fn test_bool_coercion_failure_names_key_and_value() {
        let config = config_with(&[], &[], &["WANT_LGTM"]);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let err = coerce(&config, "WANT_LGTM", &values(&["all"]), &mut sink).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("WANT_LGTM"));
        assert!(message.contains("all"));
    }

    #[test]
    fn test_bool_tag_takes_last_value_before_coercing() {
        let config = config_with(&[], &[], &["K"]);
        let mut sink: Vec<Diagnostic> = Vec::new();
        let got = coerce(&config, "K", &values(&["not-a-bool", "true"]), &mut sink).unwrap();
        assert_eq!(got, TagValue::Bool(true));
        assert_eq!(sink.len(), 1);
    }
}
