//! DispatchItem / RunResult - Dispatcher input and output

use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One unit of outbound work
///
/// Immutable once enqueued. `payload` is never inspected by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchItem {
    /// Logical identifier (used for failure reporting only)
    pub id: String,
    /// Serialized request body
    pub payload: Bytes,
}

impl DispatchItem {
    /// Create a new dispatch item
    pub fn new(id: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }
}

/// Summary of one completed dispatch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Items actually dispatched
    pub total: u64,

    /// Ids whose dispatch failed, in recording order
    pub failed: Vec<String>,

    /// Wall-clock duration measured on a monotonic clock
    #[serde(rename = "duration_ns", with = "duration_nanos")]
    pub duration: Duration,

    /// Completed items per second
    pub throughput: f64,
}

impl RunResult {
    /// Build a result, computing throughput from `total` and `duration`
    pub fn new(total: u64, failed: Vec<String>, duration: Duration) -> Self {
        Self {
            total,
            failed,
            duration,
            throughput: throughput(total, duration),
        }
    }

    /// Number of items that were dispatched successfully
    pub fn succeeded(&self) -> u64 {
        self.total.saturating_sub(self.failed.len() as u64)
    }

    /// Failure rate as percentage
    pub fn failure_rate(&self) -> f64 {
        if self.total > 0 {
            (self.failed.len() as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Items per second over `elapsed`
///
/// Returns 0.0 when the elapsed time is zero.
pub fn throughput(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
