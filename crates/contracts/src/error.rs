//! Layered error definitions
//!
//! Categorized by source: config / generation / transport

use thiserror::Error;

/// Unified contract error (configuration and IO)
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Payload synthesis failed before dispatch began
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Record could not be serialized
    #[error("failed to serialize {kind} record: {message}")]
    Serialize { kind: String, message: String },

    /// Caller-supplied batch could not be parsed
    #[error("invalid {kind} batch: {message}")]
    InvalidBatch { kind: String, message: String },

    /// Record has no usable identifier
    #[error("{kind} record at index {index} has no '{field}' field")]
    MissingId {
        kind: String,
        index: usize,
        field: String,
    },

    /// Other generation error
    #[error("{0}")]
    Other(String),
}

/// One item's outbound call failed
///
/// Contained per item: recorded by the worker pool, never aborts the run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Network-level failure (connect, send, read)
    #[error("request failed: {message}")]
    Request { message: String },

    /// Transport-level timeout elapsed
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Target answered with a non-2xx status
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// In-flight call cancelled at the run deadline
    #[error("request aborted at run deadline")]
    Aborted,

    /// Transport call panicked
    #[error("transport panicked: {message}")]
    Panicked { message: String },

    /// Transport could not be constructed
    #[error("failed to build transport: {message}")]
    Build { message: String },
}

impl TransportError {
    /// Create a request error
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::Timeout { .. } => "timeout",
            Self::Status { .. } => "status",
            Self::Aborted => "aborted",
            Self::Panicked { .. } => "panicked",
            Self::Build { .. } => "build",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Status { status: 503 };
        assert_eq!(err.to_string(), "unexpected status 503");
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_config_validation_display() {
        let err = ContractError::config_validation("load.workers", "must be > 0");
        assert_eq!(
            err.to_string(),
            "config validation error at 'load.workers': must be > 0"
        );
    }
}
