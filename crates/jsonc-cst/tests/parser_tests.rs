//! Structural parsing: decoded value graphs, key order, and error positions.

use serde_json::json;

fn parse(src: &str) -> jsonc_cst::Document {
    jsonc_cst::parse(src).expect("parse failed")
}

fn parse_err(src: &str) -> jsonc_cst::ParseError {
    jsonc_cst::parse(src).expect_err("parse unexpectedly succeeded")
}

// ============================================================================
// Decoded values
// ============================================================================

#[test]
fn decodes_scalars() {
    assert_eq!(parse("null").to_value(), json!(null));
    assert_eq!(parse("true").to_value(), json!(true));
    assert_eq!(parse("-12.5").to_value(), json!(-12.5));
    assert_eq!(parse("1e3").to_value(), json!(1000.0));
    assert_eq!(parse(r#""a\nb""#).to_value(), json!("a\nb"));
}

#[test]
fn decodes_structures_ignoring_comments() {
    let doc = parse("{\n  // note\n  \"a\": [1, /* two */ 2],\n  \"b\": {\"c\": null}\n}");
    assert_eq!(doc.to_value(), json!({"a": [1, 2], "b": {"c": null}}));
}

#[test]
fn key_order_is_source_order() {
    let doc = parse(r#"{"z": 1, "a": 2, "m": 3}"#);
    let root = doc.root().as_object().expect("object root");
    let keys: Vec<&str> = root.keys().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
    assert_eq!(root.index_of("m"), Some(2));
}

#[test]
fn string_nodes_keep_author_escapes() {
    let doc = parse(r#"{"a": "A"}"#);
    let root = doc.root().as_object().expect("object root");
    let scalar = root.get("a").and_then(|n| n.as_scalar()).expect("scalar");
    assert_eq!(scalar.lexeme(), r#""A""#);
    assert_eq!(scalar.to_value(), json!("A"));
}

#[test]
fn number_nodes_keep_author_notation() {
    let doc = parse(r#"{"a": 1e3}"#);
    let root = doc.root().as_object().expect("object root");
    let scalar = root.get("a").and_then(|n| n.as_scalar()).expect("scalar");
    assert_eq!(scalar.lexeme(), "1e3");
}

#[test]
fn trailing_commas_do_not_change_the_value() {
    assert_eq!(parse(r#"{"a": 1,}"#).to_value(), json!({"a": 1}));
    assert_eq!(parse("[1, 2,]").to_value(), json!([1, 2]));
}

#[test]
fn node_type_names() {
    assert_eq!(parse("{}").root().type_name(), "object");
    assert_eq!(parse("[]").root().type_name(), "array");
    assert_eq!(parse("\"x\"").root().type_name(), "string");
    assert_eq!(parse("1").root().type_name(), "number");
    assert_eq!(parse("true").root().type_name(), "boolean");
    assert_eq!(parse("null").root().type_name(), "null");
}

// ============================================================================
// Rejected input
// ============================================================================

#[test]
fn duplicate_key_rejected() {
    let err = parse_err(r#"{"a": 1, "a": 2}"#);
    assert!(err.message.contains("duplicate key `a`"));
    assert_eq!((err.line, err.column), (1, 10));
}

#[test]
fn duplicate_key_detected_after_unescaping() {
    let err = parse_err(r#"{"\u0061": 1, "a": 2}"#);
    assert!(err.message.contains("duplicate key `a`"));
}

#[test]
fn missing_colon() {
    let err = parse_err(r#"{"a" 1}"#);
    assert!(err.message.contains("expected `:`"));
}

#[test]
fn missing_comma() {
    let err = parse_err("{\"a\": 1\n\"b\": 2}");
    assert!(err.message.contains("expected `,`"));
    assert_eq!(err.line, 2);
}

#[test]
fn unbalanced_object() {
    let err = parse_err(r#"{"a": 1"#);
    assert!(err.message.contains("expected `,`"));
}

#[test]
fn unbalanced_array() {
    let err = parse_err("[1, 2");
    assert!(err.message.contains("expected `,`"));
}

#[test]
fn dangling_comma_value() {
    let err = parse_err("[1, , 2]");
    assert!(err.message.contains("expected a value"));
}

#[test]
fn non_string_key_rejected() {
    let err = parse_err("{1: 2}");
    assert!(err.message.contains("expected a property key"));
}

#[test]
fn trailing_content_rejected() {
    let err = parse_err("{} {}");
    assert!(err.message.contains("unexpected trailing content"));
}

#[test]
fn empty_input_rejected() {
    let err = parse_err("");
    assert!(err.message.contains("unexpected end of input"));
}

#[test]
fn comment_only_input_rejected() {
    let err = parse_err("// nothing else\n");
    assert!(err.message.contains("unexpected end of input"));
}

#[test]
fn deep_nesting_rejected() {
    let src = "[".repeat(200);
    let err = parse_err(&src);
    assert!(err.message.contains("nesting too deep"));
}

#[test]
fn error_display_carries_position() {
    let err = parse_err("{\n  \"a\": @\n}");
    assert_eq!((err.line, err.column), (2, 8));
    let shown = err.to_string();
    assert!(shown.contains("line 2"));
    assert!(shown.contains("column 8"));
}
