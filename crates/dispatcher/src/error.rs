//! Run error types

use contracts::{GenerationError, TransportError};
use thiserror::Error;

/// Errors surfaced to the caller of a dispatch run
#[derive(Debug, Error)]
pub enum RunError {
    /// Rejected before any work started
    #[error("invalid argument '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    /// Payload synthesis failed
    #[error("payload generation failed: {0}")]
    GenerationFailure(#[from] GenerationError),

    /// Run completed but some items failed transport dispatch
    #[error("{} of {total} items were not sent: {failed_ids:?}", .failed_ids.len())]
    PartialFailure { failed_ids: Vec<String>, total: u64 },

    /// Transport could not be constructed
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
}

impl RunError {
    /// Create an invalid argument error
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Failed ids of a partially failed run
    pub fn failed_ids(&self) -> Option<&[String]> {
        match self {
            Self::PartialFailure { failed_ids, .. } => Some(failed_ids),
            _ => None,
        }
    }
}
