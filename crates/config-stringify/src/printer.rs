//! Deterministic pretty rendering for the fallback path.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

/// Render the target as standard indented JSON: keys in iteration order,
/// one array element per line, no trailing newline.
pub(crate) fn pretty(target: &Map<String, Value>, indent: &str) -> String {
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    if target.serialize(&mut ser).is_err() {
        return Value::Object(target.clone()).to_string();
    }
    String::from_utf8_lossy(&buf).into_owned()
}
