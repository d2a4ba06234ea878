//! `info` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use config_loader::ConfigLoader;

use super::load_config;
use crate::cli::{InfoArgs, InfoFormat};

/// Execute the `info` command
///
/// Prints the effective configuration, defaults included.
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    info!(format = ?args.format, "Rendering effective configuration");

    let rendered = match args.format {
        InfoFormat::Toml => ConfigLoader::to_toml(&config),
        InfoFormat::Json => ConfigLoader::to_json(&config),
    }
    .context("Failed to render configuration")?;

    println!("{rendered}");
    println!(
        "# effective chunk size: {}",
        config.load.effective_chunk_size()
    );
    Ok(())
}
