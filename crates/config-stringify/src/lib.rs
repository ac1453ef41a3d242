//! # config-stringify
//!
//! Serializes a migrated configuration object back into its original JSONC
//! source text, keeping every comment and formatting quirk the author
//! wrote. This is the update step of a configuration-migration pipeline:
//! the caller computes a new configuration value graph, and this crate
//! renders it over the old text with the smallest possible edits.
//!
//! When `original` is missing, the target is rendered as standard indented
//! JSON. When it is present but unparseable, or not rooted at an object,
//! the same rendering is used and a single warning goes through the
//! injectable [`WarnSink`].
//!
//! ## Quick start
//!
//! ```rust
//! use config_stringify::{stringify_preserving_comments, DEFAULT_INDENT};
//! use serde_json::json;
//!
//! let original = "{\n  // picked by the team\n  \"schedule\": \"daily\"\n}";
//! let target = json!({"schedule": "weekly"});
//! let out = stringify_preserving_comments(
//!     target.as_object().unwrap(),
//!     Some(original),
//!     DEFAULT_INDENT,
//! );
//! assert_eq!(out, "{\n  // picked by the team\n  \"schedule\": \"weekly\"\n}");
//! ```

mod error;
mod printer;
mod reconcile;
mod sink;

use jsonc_cst::Node;
use serde_json::{Map, Value};

pub use error::PreserveError;
pub use sink::{TracingSink, WarnSink};

/// Indent used by the fallback rendering when the caller has no preference.
pub const DEFAULT_INDENT: &str = "  ";

/// Message attached to the single warning emitted when the original text
/// cannot be reused.
pub const FALLBACK_WARNING: &str =
    "Failed to preserve comments during JSON serialization, falling back to standard JSON";

/// Render `target` over the original JSONC text, preserving comments and
/// formatting of everything the migration did not change.
///
/// With `original` absent the target is rendered as plain indented JSON
/// (`fallback_indent` per level, arrays one element per line). When an
/// original is given but cannot be parsed into an object, the same plain
/// rendering is used and one warning is emitted through the default
/// [`TracingSink`].
pub fn stringify_preserving_comments(
    target: &Map<String, Value>,
    original: Option<&str>,
    fallback_indent: &str,
) -> String {
    stringify_preserving_comments_with(target, original, fallback_indent, &TracingSink)
}

/// Same as [`stringify_preserving_comments`], with an explicit warn sink.
pub fn stringify_preserving_comments_with(
    target: &Map<String, Value>,
    original: Option<&str>,
    fallback_indent: &str,
    sink: &dyn WarnSink,
) -> String {
    let Some(source) = original else {
        return printer::pretty(target, fallback_indent);
    };
    match rewrite_source(target, source) {
        Ok(text) => text,
        Err(error) => {
            sink.warn(&error, FALLBACK_WARNING);
            printer::pretty(target, fallback_indent)
        }
    }
}

/// Parse, reconcile, re-render.
fn rewrite_source(target: &Map<String, Value>, source: &str) -> Result<String, PreserveError> {
    let mut doc = jsonc_cst::parse(source)?;
    match doc.root_mut() {
        Node::Object(root) => reconcile::reconcile(root, target),
        other => {
            return Err(PreserveError::RootNotObject {
                found: other.type_name(),
            })
        }
    }
    Ok(doc.to_source())
}
