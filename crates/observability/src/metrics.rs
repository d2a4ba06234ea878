//! Dispatch metrics
//!
//! Facade-level counters for items and runs, plus in-memory latency statistics.

use std::time::Duration;

use contracts::RunResult;
use metrics::{counter, gauge, histogram};

/// Record the outcome of one transport call
///
/// `mode` is the run mode (`manual` / `load`), `latency` the call duration.
pub fn record_item_dispatched(mode: &'static str, success: bool, latency: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "loadgen_items_dispatched_total",
        "mode" => mode,
        "status" => status
    )
    .increment(1);

    histogram!("loadgen_request_latency_ms", "mode" => mode)
        .record(latency.as_secs_f64() * 1000.0);
}

/// Record a per-item transport failure by kind
pub fn record_transport_failure(mode: &'static str, kind: &'static str) {
    counter!(
        "loadgen_transport_failures_total",
        "mode" => mode,
        "kind" => kind
    )
    .increment(1);
}

/// Record the number of workers currently inside a transport call
pub fn record_in_flight(mode: &'static str, in_flight: usize) {
    gauge!("loadgen_in_flight", "mode" => mode).set(in_flight as f64);
}

/// Record a completed run
pub fn record_run_completed(mode: &'static str, result: &RunResult) {
    counter!("loadgen_runs_total", "mode" => mode).increment(1);
    gauge!("loadgen_run_items", "mode" => mode).set(result.total as f64);
    gauge!("loadgen_run_failed_items", "mode" => mode).set(result.failed.len() as f64);
    gauge!("loadgen_run_throughput_rps", "mode" => mode).set(result.throughput);
    histogram!("loadgen_run_duration_seconds", "mode" => mode)
        .record(result.duration.as_secs_f64());
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
///
/// Each worker keeps its own instance; instances are combined with [`RunningStats::merge`].
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Combine two sample sets (Chan et al. parallel variance)
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        self.mean += delta * other.count as f64 / count as f64;
        self.m2 += other.m2 + delta * delta * (self.count as f64 * other.count as f64) / count as f64;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.count = count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_merge_matches_sequential() {
        let mut left = RunningStats::default();
        let mut right = RunningStats::default();
        let mut all = RunningStats::default();

        for v in [1.0, 2.0, 3.0] {
            left.push(v);
            all.push(v);
        }
        for v in [10.0, 20.0] {
            right.push(v);
            all.push(v);
        }

        left.merge(&right);
        assert_eq!(left.count(), all.count());
        assert!((left.mean() - all.mean()).abs() < 1e-10);
        assert!((left.variance() - all.variance()).abs() < 1e-9);
        assert!((left.min() - 1.0).abs() < 1e-10);
        assert!((left.max() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_merge_into_empty() {
        let mut empty = RunningStats::default();
        let mut other = RunningStats::default();
        other.push(4.0);

        empty.merge(&other);
        assert_eq!(empty.count(), 1);
        assert!((empty.mean() - 4.0).abs() < 1e-10);

        empty.merge(&RunningStats::default());
        assert_eq!(empty.count(), 1);
    }

    #[test]
    fn test_summary_display() {
        let empty = StatsSummary::default();
        assert_eq!(empty.to_string(), "N/A");

        let summary = StatsSummary {
            count: 3,
            min: 1.0,
            max: 3.0,
            mean: 2.0,
            std_dev: 1.0,
        };
        assert!(summary.to_string().contains("n=3"));
    }

    #[test]
    fn test_record_functions_without_recorder() {
        // No recorder installed: calls are no-ops and must not panic
        record_item_dispatched("load", true, Duration::from_millis(3));
        record_transport_failure("load", "timeout");
        record_in_flight("load", 2);
        record_run_completed(
            "load",
            &RunResult::new(1, Vec::new(), Duration::from_millis(3)),
        );
    }
}
