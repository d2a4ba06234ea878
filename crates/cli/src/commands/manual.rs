//! `manual` command implementation.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use contracts::Transport;
use dispatcher::{ControllerConfig, DispatchItem, HttpTransport, LogTransport, RunController, RunError};
use synth::ManualBatch;

use super::{load_config, shutdown_signal};
use crate::cli::ManualArgs;
use crate::error::CliError;

/// Execute the `manual` command
pub async fn run_manual(args: &ManualArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;

    if let Some(ref url) = args.url {
        info!(url = %url, "Overriding manual URL from CLI");
        config.manual.url = url.clone();
    }
    if let Some(workers) = args.workers {
        info!(workers, "Overriding manual worker count from CLI");
        config.manual.workers = workers;
    }
    config_loader::ConfigLoader::validate(&config).context("Invalid configuration")?;

    let body = read_batch(&args.file)?;
    let items = ManualBatch::from_json(args.kind, &body)
        .with_context(|| format!("Failed to parse batch from {}", args.file.display()))?;

    info!(
        kind = %args.kind,
        items = items.len(),
        url = %config.manual.url,
        workers = config.manual.workers,
        dry_run = args.dry_run,
        "Manual batch loaded"
    );

    let controller_config = ControllerConfig::from_config(&config);
    let total = items.len();

    let outcome = if args.dry_run {
        let controller = RunController::manual(controller_config, Arc::new(LogTransport::default()));
        dispatch(&controller, items).await
    } else {
        let transport = HttpTransport::from_config(&config.transport)
            .context("Failed to build HTTP transport")?;
        let controller = RunController::manual(controller_config, Arc::new(transport));
        dispatch(&controller, items).await
    };

    match outcome? {
        Ok(()) => {
            println!("✓ {} {} record(s) sent to {}", total, args.kind, config.manual.url);
            Ok(())
        }
        Err(e) => {
            if let RunError::PartialFailure { failed_ids, total } = &e {
                println!("✗ {} of {} record(s) failed:", failed_ids.len(), total);
                for id in failed_ids {
                    println!("  - {id}");
                }
            }
            Err(e).context("Manual dispatch failed")
        }
    }
}

/// Run the batch unless a shutdown signal arrives first
async fn dispatch<T>(
    controller: &RunController<T>,
    items: Vec<DispatchItem>,
) -> Result<Result<(), RunError>>
where
    T: Transport + Sync + 'static,
{
    tokio::select! {
        result = controller.run_manual(items) => Ok(result),
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, abandoning manual batch");
            Err(CliError::Interrupted.into())
        }
    }
}

fn read_batch(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut body = Vec::new();
        std::io::stdin()
            .read_to_end(&mut body)
            .context("Failed to read batch from stdin")?;
        return Ok(body);
    }
    std::fs::read(path).with_context(|| format!("Failed to read batch file {}", path.display()))
}
