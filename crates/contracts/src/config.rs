//! LoadGenConfig - Config Loader output
//!
//! Describes dispatch targets, worker counts, transport tuning and generator seeding.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::RecordKind;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete load generator configuration
///
/// Every section has defaults, so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadGenConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Manual batch dispatch settings
    #[serde(default)]
    pub manual: ManualConfig,

    /// Load test settings
    #[serde(default)]
    pub load: LoadConfig,

    /// Target URL per record kind
    #[serde(default)]
    pub targets: TargetsConfig,

    /// HTTP transport tuning
    #[serde(default)]
    pub transport: TransportConfig,

    /// Record generator settings
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl LoadGenConfig {
    /// Target URL for a record kind
    pub fn target_url(&self, kind: RecordKind) -> &str {
        self.targets.url_for(kind)
    }
}

/// Manual batch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualConfig {
    /// Gateway URL receiving manual batches
    #[serde(default = "default_manual_url")]
    pub url: String,

    /// Fixed worker count for manual runs
    #[serde(default = "default_manual_workers")]
    pub workers: usize,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self {
            url: default_manual_url(),
            workers: default_manual_workers(),
        }
    }
}

fn default_manual_url() -> String {
    "http://localhost:8080/api/gtwsvc/async/credit-application".to_string()
}

fn default_manual_workers() -> usize {
    16
}

/// Load test settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Worker count for load runs (independent of manual workers)
    #[serde(default = "default_load_workers")]
    pub workers: usize,

    /// Record kind generated by default
    #[serde(default)]
    pub record_kind: RecordKind,

    /// Items generated per chunk in duration-bounded runs (None = 4 x workers)
    #[serde(default)]
    pub chunk_size: Option<usize>,

    /// Behaviour of in-flight calls at the deadline of a duration-bounded run
    #[serde(default)]
    pub deadline_policy: DeadlinePolicy,
}

impl LoadConfig {
    /// Effective chunk size for duration-bounded runs
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size
            .unwrap_or_else(|| self.workers.saturating_mul(4))
            .max(1)
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            workers: default_load_workers(),
            record_kind: RecordKind::default(),
            chunk_size: None,
            deadline_policy: DeadlinePolicy::default(),
        }
    }
}

fn default_load_workers() -> usize {
    80
}

/// What happens to in-flight calls when a run deadline elapses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlinePolicy {
    /// Stop accepting new items, let in-flight calls complete
    #[default]
    Drain,
    /// Stop accepting new items and cancel in-flight calls
    Abort,
}

/// Target URL per record kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsConfig {
    #[serde(default = "default_credit_application_url")]
    pub credit_application: String,

    #[serde(default = "default_transaction_url")]
    pub transaction: String,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            credit_application: default_credit_application_url(),
            transaction: default_transaction_url(),
        }
    }
}

impl TargetsConfig {
    /// URL receiving records of `kind`
    pub fn url_for(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::CreditApplication => &self.credit_application,
            RecordKind::Transaction => &self.transaction,
        }
    }
}

fn default_credit_application_url() -> String {
    "http://localhost:8080/api/gtwsvc/async/credit-application".to_string()
}

fn default_transaction_url() -> String {
    "http://localhost:8080/api/gtwsvc/async/transaction".to_string()
}

/// HTTP transport tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Idle connections kept per host
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    /// Idle connection lifetime in seconds
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,
}

impl TransportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_pool_max_idle_per_host() -> usize {
    100
}

fn default_pool_idle_timeout_secs() -> u64 {
    90
}

/// Record generator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Fixed RNG seed (None = seeded from the OS)
    #[serde(default)]
    pub seed: Option<u64>,
}
