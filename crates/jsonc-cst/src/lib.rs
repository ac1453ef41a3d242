//! # jsonc-cst
//!
//! Lossless parsing and comment-preserving editing of JSONC (JSON with
//! `//` and `/* */` comments and trailing commas).
//!
//! A parsed [`Document`] keeps every byte of its source: comments and
//! whitespace are attached to the tree nodes they belong to, so an
//! unedited document renders back byte-for-byte, and edits leave the
//! untouched parts of the text alone.
//!
//! ## Quick start
//!
//! ```rust
//! use serde_json::json;
//!
//! let src = "{\n  \"retries\": 3, // tuned by hand\n  \"name\": \"svc\"\n}";
//! let mut doc = jsonc_cst::parse(src).unwrap();
//! let obj = doc.root_mut().as_object_mut().unwrap();
//! obj.set_value("retries", &json!(5));
//! assert_eq!(
//!     doc.to_source(),
//!     "{\n  \"retries\": 5, // tuned by hand\n  \"name\": \"svc\"\n}"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] — tokens and trivia pieces
//! - [`parser`] — source text → [`Document`]
//! - [`node`] — the tree, its accessors, and the mutation primitives
//! - [`error`] — positioned parse errors

pub mod error;
pub mod lexer;
pub mod node;
pub mod parser;

pub use error::ParseError;
pub use node::{ArrayNode, Document, Node, ObjectNode, ScalarNode};
pub use parser::parse;
