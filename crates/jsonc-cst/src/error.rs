//! Error type for JSONC parsing.

use thiserror::Error;

/// A lexical or structural error found while parsing JSONC input.
///
/// `line` and `column` are 1-based and point at the character where the
/// error was detected. Parsing stops at the first error; there is no
/// recovery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("JSONC parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Convenience alias used throughout jsonc-cst.
pub type Result<T> = std::result::Result<T, ParseError>;
