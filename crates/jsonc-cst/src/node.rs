//! CST node types, accessors, and comment-preserving mutations.
//!
//! The tree keeps every byte of the parsed source: significant lexemes live
//! on the nodes, everything else (whitespace, comments) lives in trivia
//! strings owned by the entry that the trivia logically belongs to. An
//! object property or array element owns
//!
//! - its leading trivia (from the previous sibling's boundary, or from the
//!   opening delimiter for the first entry),
//! - the trivia between its last token and its comma (`pre_comma`),
//! - the comma itself (a flag), and
//! - the run after the comma up to and including the following newline
//!   (`post_comma`) -- this is where `, // inline` comments live, which is
//!   what makes them stick to their entry across renames and replacements.
//!
//! Trivia between the final entry (or its trailing comma) and the closing
//! delimiter is the container's `tail`, so it survives removal of that
//! entry. Rendering is the in-order concatenation of all lexemes and trivia,
//! which reproduces an unedited document byte-for-byte.
//!
//! Mutations synthesize layout deterministically: inserted entries match the
//! indentation of their siblings (single-line containers stay single-line),
//! and freshly rendered values are single-line until `ensure_multiline` is
//! asked for.

use serde_json::{Map, Number, Value};

/// One level of synthesized indentation when none can be inferred.
const INDENT_UNIT: &str = "  ";

/// A JSONC value node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(ScalarNode),
    Array(ArrayNode),
    Object(ObjectNode),
}

/// A literal: `null`, `true`/`false`, a number, or a string.
///
/// The raw lexeme is kept verbatim, so untouched literals round-trip
/// exactly (`1e3` stays `1e3`). Rewrites install a freshly rendered lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarNode {
    pub(crate) kind: ScalarKind,
    pub(crate) lexeme: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScalarKind {
    Null,
    Bool(bool),
    Number(Number),
    /// Decoded text; the lexeme keeps the author's original escapes.
    String(String),
}

/// An array element plus the trivia and comma it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub(crate) leading: String,
    pub(crate) node: Node,
    pub(crate) pre_comma: String,
    pub(crate) comma: bool,
    pub(crate) post_comma: String,
}

/// An object property: key, colon, value, and the owned trivia around them.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub(crate) leading: String,
    pub(crate) key_raw: String,
    pub(crate) key: String,
    pub(crate) pre_colon: String,
    pub(crate) post_colon: String,
    pub(crate) value: Node,
    pub(crate) pre_comma: String,
    pub(crate) comma: bool,
    pub(crate) post_comma: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub(crate) items: Vec<Item>,
    /// Trivia between the last item (or `[` when empty) and `]`.
    pub(crate) tail: String,
    /// Leading whitespace of the line containing the opening bracket.
    pub(crate) open_indent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub(crate) props: Vec<Prop>,
    pub(crate) tail: String,
    pub(crate) open_indent: String,
}

/// A parsed document: the root node plus the trivia around it (including a
/// byte-order mark, if the source had one).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) leading: String,
    pub(crate) root: Node,
    pub(crate) trailing: String,
}

impl Node {
    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Node::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectNode> {
        match self {
            Node::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Node::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayNode> {
        match self {
            Node::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarNode> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Node kind as a string, for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Scalar(s) => s.type_name(),
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }

    /// Decode this subtree into a plain value graph. Object key order is
    /// the property order of the tree.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Scalar(s) => s.to_value(),
            Node::Array(arr) => Value::Array(arr.items.iter().map(|i| i.node.to_value()).collect()),
            Node::Object(obj) => {
                let mut map = Map::new();
                for prop in &obj.props {
                    map.insert(prop.key.clone(), prop.value.to_value());
                }
                Value::Object(map)
            }
        }
    }

    pub(crate) fn write(&self, out: &mut String) {
        match self {
            Node::Scalar(s) => out.push_str(&s.lexeme),
            Node::Array(arr) => arr.write(out),
            Node::Object(obj) => obj.write(out),
        }
    }
}

impl ScalarNode {
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ScalarKind::Null => "null",
            ScalarKind::Bool(_) => "boolean",
            ScalarKind::Number(_) => "number",
            ScalarKind::String(_) => "string",
        }
    }

    pub fn to_value(&self) -> Value {
        match &self.kind {
            ScalarKind::Null => Value::Null,
            ScalarKind::Bool(b) => Value::Bool(*b),
            ScalarKind::Number(n) => Value::Number(n.clone()),
            ScalarKind::String(s) => Value::String(s.clone()),
        }
    }
}

impl ArrayNode {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index).map(|i| &i.node)
    }

    /// Replace the element at `index` with a freshly rendered value,
    /// keeping the element's trivia and comma.
    pub fn replace(&mut self, index: usize, value: &Value) {
        debug_assert!(index < self.items.len(), "array replace out of bounds");
        let Some(item) = self.items.get(index) else {
            return;
        };
        let indent = line_indent(&item.leading, &self.open_indent).to_string();
        if let Some(item) = self.items.get_mut(index) {
            item.node = node_from_value(value, &indent);
        }
    }

    /// Append an element, adding the separating comma and matching the
    /// layout of the existing elements (single-line arrays stay
    /// single-line).
    pub fn push(&mut self, value: &Value) {
        let leading = self.synth_item_leading();
        let indent = line_indent(&leading, &self.open_indent).to_string();
        if let Some(prev) = self.items.last_mut() {
            prev.comma = true;
        }
        self.items.push(Item {
            leading,
            node: node_from_value(value, &indent),
            pre_comma: String::new(),
            comma: false,
            post_comma: String::new(),
        });
    }

    /// Remove the element at `index` together with its comma. Removing the
    /// last element clears the predecessor's comma and the newline of its
    /// post-comma run instead (that line no longer exists).
    pub fn remove(&mut self, index: usize) {
        debug_assert!(index < self.items.len(), "array remove out of bounds");
        if index >= self.items.len() {
            return;
        }
        let was_last = index + 1 == self.items.len();
        self.items.remove(index);
        if was_last {
            if let Some(prev) = self.items.last_mut() {
                prev.comma = false;
                trim_final_newline(&mut prev.post_comma);
            }
        }
    }

    /// Rewrite a single-line array so each element sits on its own line one
    /// level below the opening bracket's line, with the closing bracket on
    /// its own line. Already-multi-line arrays are left untouched.
    pub fn ensure_multiline(&mut self) {
        if self.items.is_empty() || self.is_multiline() {
            return;
        }
        let elem_indent = format!("{}{}", self.open_indent, INDENT_UNIT);
        for item in &mut self.items {
            item.leading = format!("\n{elem_indent}");
        }
        self.tail = format!("\n{}", self.open_indent);
    }

    fn is_multiline(&self) -> bool {
        self.items.iter().any(|i| {
            i.leading.contains('\n') || i.pre_comma.contains('\n') || i.post_comma.contains('\n')
        }) || self.tail.contains('\n')
    }

    fn synth_item_leading(&self) -> String {
        if self.items.is_empty() {
            return String::new();
        }
        match self.items.iter().find(|i| i.leading.contains('\n')) {
            Some(item) => format!("\n{}", line_indent(&item.leading, &self.open_indent)),
            None if self.is_multiline() => {
                format!("\n{}{}", self.open_indent, INDENT_UNIT)
            }
            None => " ".to_string(),
        }
    }

    fn write(&self, out: &mut String) {
        out.push('[');
        for item in &self.items {
            out.push_str(&item.leading);
            item.node.write(out);
            out.push_str(&item.pre_comma);
            if item.comma {
                out.push(',');
            }
            out.push_str(&item.post_comma);
        }
        out.push_str(&self.tail);
        out.push(']');
    }
}

impl ObjectNode {
    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.props.iter().map(|p| p.key.as_str())
    }

    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.props.get(index).map(|p| p.key.as_str())
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.props.iter().position(|p| p.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.props.iter().find(|p| p.key == key).map(|p| &p.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.props
            .iter_mut()
            .find(|p| p.key == key)
            .map(|p| &mut p.value)
    }

    /// Swap the value of an existing property for a freshly rendered one.
    /// All trivia of the property, including a post-comma inline comment,
    /// stays in place. Returns `false` when the key is absent.
    pub fn set_value(&mut self, key: &str, value: &Value) -> bool {
        let Some(index) = self.index_of(key) else {
            return false;
        };
        let indent = line_indent(&self.props[index].leading, &self.open_indent).to_string();
        self.props[index].value = node_from_value(value, &indent);
        true
    }

    /// Rewrite both key and value of the property at `index`, preserving
    /// every piece of the entry's trivia. This is the in-place rename used
    /// when a removal and an insertion meet at the same slot.
    pub fn replace_entry(&mut self, index: usize, new_key: &str, value: &Value) {
        debug_assert!(index < self.props.len(), "object replace out of bounds");
        debug_assert!(
            self.index_of(new_key).map_or(true, |i| i == index),
            "duplicate key `{new_key}`"
        );
        let Some(prop) = self.props.get(index) else {
            return;
        };
        let indent = line_indent(&prop.leading, &self.open_indent).to_string();
        let node = node_from_value(value, &indent);
        let prop = &mut self.props[index];
        prop.key_raw = escape_json_string(new_key);
        prop.key = new_key.to_string();
        prop.value = node;
    }

    /// Insert a new property at `index`. The leading trivia is synthesized
    /// to match the sibling indentation; a comma is added after the
    /// predecessor when missing, and after the new property when more
    /// properties follow.
    pub fn insert(&mut self, index: usize, key: &str, value: &Value) {
        debug_assert!(index <= self.props.len(), "object insert out of bounds");
        debug_assert!(!self.contains_key(key), "duplicate key `{key}`");
        let index = index.min(self.props.len());

        if self.props.is_empty() {
            let indent = format!("{}{}", self.open_indent, INDENT_UNIT);
            let prop = fresh_prop(key, value, format!("\n{indent}"), &indent, false, String::new());
            self.props.push(prop);
            let close = format!("\n{}", self.open_indent);
            if self.tail.trim().is_empty() {
                self.tail = close;
            } else {
                self.tail.push_str(&close);
            }
            return;
        }

        let multiline = self.is_multiline();
        let indent = self.child_indent();
        let has_follower = index < self.props.len();

        let (leading, post_comma) = if !multiline {
            (" ".to_string(), String::new())
        } else if index == 0 {
            (format!("\n{indent}"), String::new())
        } else {
            let prev = &self.props[index - 1];
            if has_follower && prev.comma && prev.post_comma.ends_with('\n') {
                // The previous comma already owns the line break; the new
                // property takes over the freed line.
                (indent.clone(), newline_style(&prev.post_comma))
            } else {
                (format!("\n{indent}"), String::new())
            }
        };

        if index > 0 {
            self.props[index - 1].comma = true;
        }
        let prop = fresh_prop(key, value, leading, &indent, has_follower, post_comma);
        self.props.insert(index, prop);
    }

    /// Insert after the last existing property.
    pub fn append(&mut self, key: &str, value: &Value) {
        self.insert(self.props.len(), key, value);
    }

    /// Remove a property together with its leading trivia and its comma
    /// (the following comma when one exists; otherwise the preceding one).
    /// The container's interior-tail trivia is untouched. Returns `false`
    /// when the key is absent.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(index) = self.index_of(key) else {
            return false;
        };
        let was_last = index + 1 == self.props.len();
        self.props.remove(index);
        if was_last {
            if let Some(prev) = self.props.last_mut() {
                prev.comma = false;
                trim_final_newline(&mut prev.post_comma);
            }
        }
        true
    }

    fn is_multiline(&self) -> bool {
        self.props.iter().any(|p| {
            p.leading.contains('\n')
                || p.pre_colon.contains('\n')
                || p.post_colon.contains('\n')
                || p.pre_comma.contains('\n')
                || p.post_comma.contains('\n')
        }) || self.tail.contains('\n')
    }

    /// Indentation for a property line, inferred from existing siblings and
    /// falling back to one level below the opening brace's line.
    fn child_indent(&self) -> String {
        for prop in &self.props {
            if prop.leading.contains('\n') {
                return line_indent(&prop.leading, &self.open_indent).to_string();
            }
        }
        for pair in self.props.windows(2) {
            if pair[0].post_comma.ends_with('\n') {
                let lead = &pair[1].leading;
                let end = lead
                    .find(|c: char| c != ' ' && c != '\t')
                    .unwrap_or(lead.len());
                return lead[..end].to_string();
            }
        }
        format!("{}{}", self.open_indent, INDENT_UNIT)
    }

    fn write(&self, out: &mut String) {
        out.push('{');
        for prop in &self.props {
            out.push_str(&prop.leading);
            out.push_str(&prop.key_raw);
            out.push_str(&prop.pre_colon);
            out.push(':');
            out.push_str(&prop.post_colon);
            prop.value.write(out);
            out.push_str(&prop.pre_comma);
            if prop.comma {
                out.push(',');
            }
            out.push_str(&prop.post_comma);
        }
        out.push_str(&self.tail);
        out.push('}');
    }
}

impl Document {
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Render the document back to text by in-order concatenation of
    /// lexemes and trivia. For an unedited tree this is the original source.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.leading);
        self.root.write(&mut out);
        out.push_str(&self.trailing);
        out
    }

    /// Decode the whole document into a plain value graph.
    pub fn to_value(&self) -> Value {
        self.root.to_value()
    }
}

/// Render a plain value as a fresh CST node. Containers come out
/// single-line; `ensure_multiline` upgrades arrays afterwards when needed.
/// `open_indent` is recorded on containers so later layout synthesis knows
/// the line they live on.
pub(crate) fn node_from_value(value: &Value, open_indent: &str) -> Node {
    match value {
        Value::Null => Node::Scalar(ScalarNode {
            kind: ScalarKind::Null,
            lexeme: "null".to_string(),
        }),
        Value::Bool(b) => Node::Scalar(ScalarNode {
            kind: ScalarKind::Bool(*b),
            lexeme: b.to_string(),
        }),
        Value::Number(n) => Node::Scalar(ScalarNode {
            kind: ScalarKind::Number(n.clone()),
            lexeme: n.to_string(),
        }),
        Value::String(s) => Node::Scalar(ScalarNode {
            kind: ScalarKind::String(s.clone()),
            lexeme: escape_json_string(s),
        }),
        Value::Array(elems) => {
            let items = elems
                .iter()
                .enumerate()
                .map(|(i, elem)| Item {
                    leading: if i == 0 { String::new() } else { " ".to_string() },
                    node: node_from_value(elem, open_indent),
                    pre_comma: String::new(),
                    comma: i + 1 < elems.len(),
                    post_comma: String::new(),
                })
                .collect();
            Node::Array(ArrayNode {
                items,
                tail: String::new(),
                open_indent: open_indent.to_string(),
            })
        }
        Value::Object(map) => {
            let len = map.len();
            let props = map
                .iter()
                .enumerate()
                .map(|(i, (key, val))| {
                    let mut prop = fresh_prop(
                        key,
                        val,
                        String::new(),
                        open_indent,
                        i + 1 < len,
                        String::new(),
                    );
                    if i > 0 {
                        prop.leading = " ".to_string();
                    }
                    prop
                })
                .collect();
            Node::Object(ObjectNode {
                props,
                tail: String::new(),
                open_indent: open_indent.to_string(),
            })
        }
    }
}

fn fresh_prop(
    key: &str,
    value: &Value,
    leading: String,
    indent: &str,
    comma: bool,
    post_comma: String,
) -> Prop {
    Prop {
        leading,
        key_raw: escape_json_string(key),
        key: key.to_string(),
        pre_colon: String::new(),
        post_colon: " ".to_string(),
        value: node_from_value(value, indent),
        pre_comma: String::new(),
        comma,
        post_comma,
    }
}

/// Render a string lexeme with minimal escaping: quotes, backslashes, and
/// control characters only.
pub(crate) fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Whitespace of the last line started inside `leading`, or `fallback`
/// when the trivia has no line break.
fn line_indent<'a>(leading: &'a str, fallback: &'a str) -> &'a str {
    match leading.rfind('\n') {
        Some(pos) => {
            let rest = &leading[pos + 1..];
            let end = rest
                .find(|c: char| c != ' ' && c != '\t')
                .unwrap_or(rest.len());
            &rest[..end]
        }
        None => fallback,
    }
}

fn newline_style(post_comma: &str) -> String {
    if post_comma.ends_with("\r\n") {
        "\r\n".to_string()
    } else {
        "\n".to_string()
    }
}

fn trim_final_newline(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}
