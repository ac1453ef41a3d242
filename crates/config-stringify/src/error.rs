//! Error type for the comment-preserving path.

use thiserror::Error;

/// Why the original source text could not be edited in place.
///
/// These never escape the facade: they are handed to the warn sink and the
/// plain rendering takes over.
#[derive(Debug, Error)]
pub enum PreserveError {
    /// The original text is not valid JSONC.
    #[error(transparent)]
    Parse(#[from] jsonc_cst::ParseError),
    /// The original text parsed, but its root cannot hold properties.
    #[error("root of the original source is {found}, expected an object")]
    RootNotObject { found: &'static str },
}
