//! Raw and JSON output encodings for typed tag values

use std::collections::BTreeMap;

use crate::tags::config::{OutputFormat, TagConfig};
use crate::tags::errors::TagError;
use crate::tags::value::TagValue;

/// Serialize the selected tag values according to the configured format.
///
/// The map is ordered, so keys come out in ascending lexical order in
/// both formats and encoding is deterministic byte-for-byte.
pub fn serialize(
    config: &TagConfig,
    tags: &BTreeMap<String, TagValue>,
) -> Result<String, TagError> {
    match config.format {
        OutputFormat::Raw => Ok(serialize_raw(tags)),
        OutputFormat::Json => serialize_json(tags, config.pretty_print),
    }
}

/// One `KEY=value` line per key, newline-terminated. Array elements are
/// comma-joined with literal commas escaped as `\,` so the separators
/// stay unambiguous on a single line.
fn serialize_raw(tags: &BTreeMap<String, TagValue>) -> String {
    let mut out = String::new();
    for (key, value) in tags {
        let rendered = match value {
            TagValue::String(s) => s.clone(),
            TagValue::Bool(b) => b.to_string(),
            TagValue::Array(items) => {
                items.iter().map(|item| escape_commas(item)).collect::<Vec<_>>().join(",")
            }
        };
        out.push_str(key);
        out.push('=');
        out.push_str(&rendered);
        out.push('\n');
    }
    out
}

/// A single JSON object. Commas need no escaping here; JSON string
/// encoding handles them natively.
fn serialize_json(tags: &BTreeMap<String, TagValue>, pretty: bool) -> Result<String, TagError> {
    let encoded =
        if pretty { serde_json::to_string_pretty(tags) } else { serde_json::to_string(tags) };
    Ok(encoded?)
}

fn escape_commas(value: &str) -> String {
    value.replace(',', "\\,")
}
