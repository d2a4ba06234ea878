//! Pool metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters for a single worker pool
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Current queue length
    queue_len: AtomicUsize,
    /// Workers currently inside a transport call
    in_flight: AtomicUsize,
    /// Items accepted by a worker
    dispatched_count: AtomicU64,
    /// Successful calls
    success_count: AtomicU64,
    /// Failed calls
    failure_count: AtomicU64,
}

impl PoolMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_len(&self) -> usize {
        self.queue_len.load(Ordering::Relaxed)
    }

    pub fn set_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Mark a call as started, returning the new in-flight count
    pub fn call_started(&self) -> usize {
        self.in_flight.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Mark a call as finished, returning the new in-flight count
    pub fn call_finished(&self) -> usize {
        self.in_flight.fetch_sub(1, Ordering::Relaxed).saturating_sub(1)
    }

    pub fn dispatched_count(&self) -> u64 {
        self.dispatched_count.load(Ordering::Relaxed)
    }

    pub fn inc_dispatched_count(&self) {
        self.dispatched_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn success_count(&self) -> u64 {
        self.success_count.load(Ordering::Relaxed)
    }

    pub fn inc_success_count(&self) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queue_len: self.queue_len(),
            in_flight: self.in_flight(),
            dispatched_count: self.dispatched_count(),
            success_count: self.success_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of pool metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queue_len: usize,
    pub in_flight: usize,
    pub dispatched_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
}
