//! Line-grammar matcher for `KEY=VALUE` tags

use once_cell::sync::Lazy;
use regex::Regex;

use crate::tags::diagnostics::{Diagnostic, DiagnosticSink};

/// A tag line is a key of `[A-Za-z0-9_]` characters anchored at line
/// start, immediately followed by `=`, then the rest of the line. An
/// apparent `KEY=value` mid-sentence never matches; prose contains `=`
/// incidentally.
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([A-Za-z0-9_]*)=([^\n\r]*)").expect("Invalid regex pattern")
});

/// Ordered-by-first-occurrence grouping of tag values by uppercased key.
///
/// Values for one key keep their encounter order across the whole
/// document; last-wins and array policies are defined over that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagGroups {
    groups: Vec<(String, Vec<String>)>,
}

impl TagGroups {
    fn push(&mut self, key: String, value: String) {
        match self.groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.groups.push((key, vec![value])),
        }
    }

    /// Iterate groups in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

/// Extract all tag lines from free-form text, grouped by uppercased key.
///
/// A match missing a capture group is skipped with a diagnostic rather
/// than failing the whole parse.
pub fn match_tags(text: &str, sink: &mut dyn DiagnosticSink) -> TagGroups {
    let mut groups = TagGroups::default();
    for caps in TAG_PATTERN.captures_iter(text) {
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
            let matched = caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default();
            sink.emit(Diagnostic::MalformedMatch { matched });
            continue;
        };
        groups.push(key.as_str().to_uppercase(), value.as_str().to_string());
    }
    groups
}
