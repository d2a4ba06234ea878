//! Error types and exit codes for CLI operations.

use dispatcher::RunError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file given explicitly but missing
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Run stopped by Ctrl+C / SIGTERM
    #[error("Interrupted by shutdown signal")]
    Interrupted,
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}

/// Map a command failure to the process exit code
///
/// 2 = run finished with failed items, 130 = interrupted, 1 = anything else.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(RunError::PartialFailure { .. }) = error.downcast_ref::<RunError>() {
        return 2;
    }
    if let Some(CliError::Interrupted) = error.downcast_ref::<CliError>() {
        return 130;
    }
    1
}
