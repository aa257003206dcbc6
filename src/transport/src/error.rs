//! Error types for transport operations.

use thiserror::Error;

/// Error type for transport operations.
///
/// A nonzero engine status is not an error — it is reported through
/// [`RunOutcome`](crate::transport::RunOutcome). These variants cover
/// failures local to this crate: bad input before a run is invoked, or a
/// fact payload we cannot read after one.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A required fact was missing or malformed in a host's raw payload.
    #[error("Unable to extract '{field}' from facts for {host}")]
    Extraction { host: String, field: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Runbook render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
