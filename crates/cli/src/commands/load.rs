//! `load` command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use contracts::{DeadlinePolicy, LoadGenConfig, RunResult, Transport};
use dispatcher::{ControllerConfig, HttpTransport, LogTransport, RunController, RunError};
use synth::RecordGenerator;

use super::{load_config, shutdown_signal};
use crate::cli::LoadArgs;
use crate::error::CliError;
use crate::report;

/// What ends a load run
#[derive(Debug, Clone, Copy, PartialEq)]
enum RunBound {
    Count(usize),
    Duration(Duration),
}

impl RunBound {
    fn from_args(args: &LoadArgs) -> Result<Self> {
        if args.abort_at_deadline && args.duration.is_none() {
            anyhow::bail!("--abort-at-deadline only applies to --duration runs");
        }
        match (args.count, args.duration) {
            (Some(count), _) => Ok(Self::Count(count)),
            (None, Some(secs)) => Duration::try_from_secs_f64(secs)
                .map(Self::Duration)
                .with_context(|| format!("Invalid duration: {secs}")),
            (None, None) => anyhow::bail!("Either --count or --duration is required"),
        }
    }
}

/// Execute the `load` command
pub async fn run_load(args: &LoadArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    apply_overrides(&mut config, args);
    config_loader::ConfigLoader::validate(&config).context("Invalid configuration")?;

    let bound = RunBound::from_args(args)?;
    let kind = config.load.record_kind;
    let target = config.target_url(kind).to_string();

    info!(
        kind = %kind,
        target = %target,
        workers = config.load.workers,
        bound = ?bound,
        seed = ?config.generator.seed,
        dry_run = args.dry_run,
        "Starting load run"
    );

    let source = RecordGenerator::from_seed(kind, config.generator.seed);
    let controller_config = ControllerConfig::from_config(&config);

    let outcome = if args.dry_run {
        let controller =
            RunController::new(controller_config, Arc::new(LogTransport::default()), source);
        execute(controller, bound).await?
    } else {
        let transport = HttpTransport::from_config(&config.transport)
            .context("Failed to build HTTP transport")?;
        let controller = RunController::new(controller_config, Arc::new(transport), source);
        execute(controller, bound).await?
    };
    let result = outcome.context("Load run failed")?;

    if !result.failed.is_empty() {
        warn!(
            failed = result.failed.len(),
            total = result.total,
            "Load run finished with failures"
        );
    }

    if args.json {
        let json =
            serde_json::to_string_pretty(&result).context("Failed to serialize run result")?;
        println!("{json}");
    } else {
        report::print_summary(&result, &target);
    }

    Ok(())
}

fn apply_overrides(config: &mut LoadGenConfig, args: &LoadArgs) {
    if let Some(kind) = args.kind {
        config.load.record_kind = kind;
    }
    if let Some(workers) = args.workers {
        info!(workers, "Overriding load worker count from CLI");
        config.load.workers = workers;
    }
    if let Some(ref url) = args.url {
        info!(url = %url, "Overriding target URL from CLI");
        match config.load.record_kind {
            contracts::RecordKind::CreditApplication => {
                config.targets.credit_application = url.clone()
            }
            contracts::RecordKind::Transaction => config.targets.transaction = url.clone(),
        }
    }
    if args.seed.is_some() {
        config.generator.seed = args.seed;
    }
    if args.abort_at_deadline {
        config.load.deadline_policy = DeadlinePolicy::Abort;
    }
}

/// Run to completion unless a shutdown signal arrives first
async fn execute<T>(
    mut controller: RunController<T, RecordGenerator>,
    bound: RunBound,
) -> Result<Result<RunResult, RunError>>
where
    T: Transport + Sync + 'static,
{
    let run = async {
        match bound {
            RunBound::Count(count) => controller.run_load(count).await,
            RunBound::Duration(duration) => controller.run_load_for(duration).await,
        }
    };

    tokio::select! {
        result = run => Ok(result),
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, stopping load run");
            Err(CliError::Interrupted.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use contracts::RecordKind;

    fn load_args(argv: &[&str]) -> LoadArgs {
        let mut full = vec!["loadgen", "load"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Load(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_run_bound() {
        assert_eq!(
            RunBound::from_args(&load_args(&["-n", "10"])).unwrap(),
            RunBound::Count(10)
        );
        assert_eq!(
            RunBound::from_args(&load_args(&["-d", "1.5"])).unwrap(),
            RunBound::Duration(Duration::from_millis(1500))
        );
        assert!(RunBound::from_args(&load_args(&["-d", "NaN"])).is_err());
    }

    #[test]
    fn test_abort_rejected_for_count_runs() {
        let mut args = load_args(&["-n", "5"]);
        args.abort_at_deadline = true;
        assert!(RunBound::from_args(&args).is_err());

        let mut args = load_args(&["-d", "2"]);
        args.abort_at_deadline = true;
        assert_eq!(
            RunBound::from_args(&args).unwrap(),
            RunBound::Duration(Duration::from_secs(2))
        );
    }

    #[test]
    fn test_overrides() {
        let args = load_args(&[
            "-n",
            "10",
            "--kind",
            "transaction",
            "--workers",
            "3",
            "--url",
            "http://example.test/txn",
            "--seed",
            "7",
        ]);
        let mut config = LoadGenConfig::default();
        apply_overrides(&mut config, &args);

        assert_eq!(config.load.record_kind, RecordKind::Transaction);
        assert_eq!(config.load.workers, 3);
        assert_eq!(config.targets.transaction, "http://example.test/txn");
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.load.deadline_policy, DeadlinePolicy::Drain);
    }

    #[tokio::test]
    async fn test_execute_dry_run() {
        let config = ControllerConfig {
            load_workers: 4,
            chunk_size: 16,
            ..ControllerConfig::default()
        };
        let controller = RunController::new(
            config,
            Arc::new(LogTransport::default()),
            RecordGenerator::with_seed(RecordKind::CreditApplication, 1),
        );

        let result = execute(controller, RunBound::Count(25)).await.unwrap().unwrap();
        assert_eq!(result.total, 25);
        assert!(result.failed.is_empty());
    }
}
