//! Command implementations.

mod info;
mod load;
mod manual;
mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use contracts::LoadGenConfig;

use crate::cli::ConfigArgs;
use crate::error::CliError;

pub use info::run_info;
pub use load::run_load;
pub use manual::run_manual;
pub use validate::run_validate;

/// Picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "loadgen.toml";

/// Config file a command should read, if any
pub fn resolve_config_path(args: &ConfigArgs) -> Option<PathBuf> {
    match &args.config {
        Some(path) => Some(path.clone()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

/// Load and validate the configuration, falling back to defaults
pub fn load_config(args: &ConfigArgs) -> Result<LoadGenConfig> {
    match resolve_config_path(args) {
        Some(path) => load_config_file(&path),
        None => {
            info!("No configuration file, using defaults");
            Ok(LoadGenConfig::default())
        }
    }
}

fn load_config_file(path: &Path) -> Result<LoadGenConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }
    info!(config = %path.display(), "Loading configuration");
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Resolve when Ctrl+C or SIGTERM arrives
///
/// A handler that cannot be installed never resolves.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
