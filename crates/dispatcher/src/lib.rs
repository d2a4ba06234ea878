//! # Dispatcher
//!
//! Concurrent dispatch of payloads to an HTTP target.
//!
//! Responsibilities:
//! - Fan items out to a fixed worker pool over a bounded queue
//! - Contain per-item failures, including panics, and collect failed ids
//! - Run manual batches, count-bounded and duration-bounded load tests

pub mod aggregator;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod transports;

pub use aggregator::FailureAggregator;
pub use contracts::{DispatchItem, RunResult, Transport};
pub use controller::{ControllerConfig, RunController};
pub use error::RunError;
pub use metrics::{MetricsSnapshot, PoolMetrics};
pub use pool::{PoolHandle, PoolReport, RunMode, WorkerPool};
pub use transports::{HttpTransport, LogTransport};
