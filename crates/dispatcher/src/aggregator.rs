//! FailureAggregator - collects failed item ids from concurrent workers

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe collector of failed item identifiers
///
/// Appends are serialized by a mutex. Reads are only meaningful once the
/// worker pool has been joined.
#[derive(Debug, Default)]
pub struct FailureAggregator {
    failed: Mutex<Vec<String>>,
}

impl FailureAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failed item
    pub fn record_failure(&self, id: impl Into<String>) {
        self.lock().push(id.into());
    }

    /// Number of recorded failures
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the recorded ids, in recording order
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Take the recorded ids, leaving the aggregator empty
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    // Appends cannot panic mid-update, so a poisoned vector is still consistent
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.failed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
