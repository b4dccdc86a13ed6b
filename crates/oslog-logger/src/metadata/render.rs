//! Canonical text form of metadata values and pairs.
//!
//! Output is printable ASCII only. Newlines, tabs and other control
//! characters become backslash escapes, so a rendered value never spans more
//! than one line. Characters outside ASCII become `\u{...}` escapes.

use super::{Metadata, MetadataValue};

/// Appends `text` to `out` with escapes applied. Double quotes are escaped
/// only when the text is going to be wrapped in quotes.
fn escape_into(out: &mut String, text: &str, quoted: bool) {
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            '"' if quoted => out.push_str("\\\""),
            ' '..='~' => out.push(ch),
            _ => out.extend(ch.escape_unicode()),
        }
    }
}

/// Escapes a metadata key. Keys are printed bare, without quotes.
///
/// ```
/// use oslog_logger::metadata::escape_key;
///
/// assert_eq!(escape_key("multi\nline"), "multi\\nline");
/// assert_eq!(escape_key("caf\u{e9}"), "caf\\u{e9}");
/// ```
pub fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    escape_into(&mut out, key, false);
    out
}

/// Renders one value.
///
/// ```
/// use oslog_logger::{Metadata, MetadataValue};
/// use oslog_logger::metadata::render_value;
///
/// let mut nested = Metadata::new();
/// nested.insert("z".into(), "last".into());
/// nested.insert("a".into(), vec!["x", "y"].into());
///
/// assert_eq!(render_value(&MetadataValue::Map(nested)), r#"[a: ["x", "y"], z: "last"]"#);
/// ```
pub fn render_value(value: &MetadataValue) -> String {
    let mut out = String::new();
    render_into(&mut out, value);
    out
}

/// Renders `"<escaped key>: <rendered value>"`.
pub fn format_pair(key: &str, value: &MetadataValue) -> String {
    let mut out = String::with_capacity(key.len() + 8);
    pair_into(&mut out, key, value);
    out
}

fn render_into(out: &mut String, value: &MetadataValue) {
    match value {
        MetadataValue::String(text) => quoted_into(out, text),
        MetadataValue::List(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                render_into(out, item);
            }
            out.push(']');
        }
        MetadataValue::Map(map) => {
            out.push('[');
            for (index, (key, item)) in sorted_entries(map).into_iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                pair_into(out, key, item);
            }
            out.push(']');
        }
        MetadataValue::Describable(value) => quoted_into(out, &value.to_string()),
    }
}

fn quoted_into(out: &mut String, text: &str) {
    out.push('"');
    escape_into(out, text, true);
    out.push('"');
}

fn pair_into(out: &mut String, key: &str, value: &MetadataValue) {
    escape_into(out, key, false);
    out.push_str(": ");
    render_into(out, value);
}

/// Entries ordered by key. Keys are unique, so an unstable sort is exact.
pub(crate) fn sorted_entries(map: &Metadata) -> Vec<(&str, &MetadataValue)> {
    let mut entries: Vec<_> = map.iter().map(|(key, value)| (key.as_str(), value)).collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
}
