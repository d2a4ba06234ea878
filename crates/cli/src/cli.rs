//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use contracts::RecordKind;

/// Load generator for the credit application gateway
#[derive(Parser, Debug)]
#[command(
    name = "loadgen",
    author,
    version,
    about = "Concurrent HTTP load generator for credit applications and transactions",
    long_about = "Dispatches caller-supplied batches or synthetic records to the gateway \n\
                  through a fixed pool of workers, then reports failures and throughput."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LOADGEN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "LOADGEN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Prometheus exporter port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "LOADGEN_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch a JSON batch of records to the gateway
    Manual(ManualArgs),

    /// Generate synthetic records and dispatch them
    Load(LoadArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display effective configuration
    Info(InfoArgs),
}

/// Configuration file selection shared by every command
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to configuration file (TOML or JSON); `loadgen.toml` is used when present
    #[arg(short, long, env = "LOADGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `manual` command
#[derive(Parser, Debug, Clone)]
pub struct ManualArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// JSON file holding an array of records ("-" reads stdin)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Record kind contained in the batch
    #[arg(short, long, default_value = "credit-application")]
    pub kind: RecordKind,

    /// Override the gateway URL
    #[arg(long, env = "CAF_GATEWAY_URL")]
    pub url: Option<String>,

    /// Override the manual worker count
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Log each call instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `load` command
#[derive(Parser, Debug, Clone)]
pub struct LoadArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Number of records to dispatch
    #[arg(short = 'n', long, conflicts_with = "duration", required_unless_present = "duration")]
    pub count: Option<usize>,

    /// Run for this many seconds instead of a fixed count
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Record kind to generate (defaults to `load.record_kind`)
    #[arg(short, long)]
    pub kind: Option<RecordKind>,

    /// Override the target URL for the chosen kind
    #[arg(long)]
    pub url: Option<String>,

    /// Override the load worker count
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Fixed generator seed
    #[arg(long, env = "LOADGEN_SEED")]
    pub seed: Option<u64>,

    /// Cancel in-flight calls at the deadline instead of letting them finish
    #[arg(long, requires = "duration", conflicts_with = "count")]
    pub abort_at_deadline: bool,

    /// Log each call instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "toml")]
    pub format: InfoFormat,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Output format of the `info` command
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum InfoFormat {
    #[default]
    Toml,
    Json,
}
