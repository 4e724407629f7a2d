//! Body rendering policy shared by requests and responses.

use super::exchange::Body;
use super::highlight::{ContentKind, Highlighter};
use super::html;
use serde_json::Value;

pub const UNKNOWN: &str = "<unknown>";
pub const EMPTY: &str = "<empty>";
pub const BINARY: &str = "<binary>";

/// Render a body for display according to its declared content type.
///
/// JSON is re-serialised with sorted keys and two-space indentation, HTML is
/// reflowed, anything else is emitted verbatim. A body that fails to parse as
/// its declared type is emitted verbatim too.
pub fn format_body(body: &Body, content_type: Option<&str>, highlighter: &dyn Highlighter) -> String {
    let Some(content_type) = content_type.filter(|ct| !ct.is_empty()) else {
        return UNKNOWN.to_string();
    };
    if body.is_empty() {
        return EMPTY.to_string();
    }
    let Some(text) = body.as_text() else {
        return BINARY.to_string();
    };

    if content_type.contains("application/json") {
        if let Some(pretty) = pretty_json(text) {
            return highlighter.highlight(ContentKind::Json, &pretty);
        }
    } else if content_type.contains("text/html") {
        return highlighter.highlight(ContentKind::Html, &html::prettify(text));
    }

    text.to_string()
}

fn pretty_json(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    serde_json::to_string_pretty(&sort_keys(value)).ok()
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
