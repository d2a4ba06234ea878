//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::LoadGenConfig;

use super::{load_config, resolve_config_path};
use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let config_path = resolve_config_path(&args.config).map(|p| p.display().to_string());
    info!(config = ?config_path, "Validating configuration");

    let result = match load_config(&args.config) {
        Ok(config) => ValidationResult {
            valid: true,
            config_path,
            error: None,
            warnings: collect_warnings(&config),
        },
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("{e:#}")),
            warnings: Vec::new(),
        },
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

/// Non-fatal issues worth pointing out
fn collect_warnings(config: &LoadGenConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.generator.seed.is_some() {
        warnings.push("generator.seed is set - every run sends the same records".to_string());
    }
    if let Some(chunk) = config.load.chunk_size {
        if chunk < config.load.workers {
            warnings.push(format!(
                "load.chunk_size ({chunk}) is smaller than load.workers ({}) - workers may idle",
                config.load.workers
            ));
        }
    }
    if config.transport.pool_max_idle_per_host < config.load.workers {
        warnings.push(format!(
            "transport.pool_max_idle_per_host ({}) is below load.workers ({}) - connections will churn",
            config.transport.pool_max_idle_per_host, config.load.workers
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    let source = result.config_path.as_deref().unwrap_or("<defaults>");
    if result.valid {
        println!("✓ Configuration is valid: {source}");
        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("✗ Configuration is invalid: {source}");
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
