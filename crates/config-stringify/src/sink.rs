//! Warning sink for the fallback path.

use crate::PreserveError;

/// Receiver for the facade's single fallback warning. Injectable so
/// embedders route it into their own logging and tests can capture it.
pub trait WarnSink {
    fn warn(&self, error: &PreserveError, message: &str);
}

/// Default sink: forwards to `tracing` at warn level.
pub struct TracingSink;

impl WarnSink for TracingSink {
    fn warn(&self, error: &PreserveError, message: &str) {
        tracing::warn!(error = %error, "{message}");
    }
}
