//! WorkerPool - fixed set of workers draining a shared bounded queue

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use async_channel::Receiver;
use futures::FutureExt;
use tokio::task::JoinSet;
use tokio::time::sleep_until;
use tracing::{debug, error, instrument, warn};

use contracts::{DeadlinePolicy, DispatchItem, Transport, TransportError};
use observability::RunningStats;

use crate::aggregator::FailureAggregator;
use crate::metrics::PoolMetrics;

/// Run mode label used in logs and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Manual,
    Load,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Load => "load",
        }
    }
}

/// Shared state every worker of one pool reads
struct WorkerContext<T> {
    mode: RunMode,
    url: Arc<str>,
    transport: Arc<T>,
    aggregator: Arc<FailureAggregator>,
    metrics: Arc<PoolMetrics>,
    /// Workers stop accepting items once this instant passes
    deadline: Option<tokio::time::Instant>,
    policy: DeadlinePolicy,
}

/// Configured but not yet started pool
pub struct WorkerPool<T> {
    mode: RunMode,
    workers: usize,
    url: Arc<str>,
    transport: Arc<T>,
    aggregator: Arc<FailureAggregator>,
    metrics: Arc<PoolMetrics>,
    deadline: Option<tokio::time::Instant>,
    policy: DeadlinePolicy,
}

impl<T> WorkerPool<T>
where
    T: Transport + Sync + 'static,
{
    /// Create a pool of `workers` tasks sending every item to `url`
    pub fn new(
        mode: RunMode,
        workers: usize,
        url: &str,
        transport: Arc<T>,
        aggregator: Arc<FailureAggregator>,
    ) -> Self {
        Self {
            mode,
            workers,
            url: Arc::from(url),
            transport,
            aggregator,
            metrics: Arc::new(PoolMetrics::new()),
            deadline: None,
            policy: DeadlinePolicy::default(),
        }
    }

    /// Bound the run by a deadline
    pub fn with_deadline(mut self, deadline: tokio::time::Instant, policy: DeadlinePolicy) -> Self {
        self.deadline = Some(deadline);
        self.policy = policy;
        self
    }

    pub fn metrics(&self) -> &Arc<PoolMetrics> {
        &self.metrics
    }

    /// Start all workers on `rx`
    ///
    /// Workers exit when the queue is closed and drained, or when the
    /// deadline passes.
    pub fn spawn(self, rx: Receiver<DispatchItem>) -> PoolHandle {
        let ctx = Arc::new(WorkerContext {
            mode: self.mode,
            url: self.url,
            transport: self.transport,
            aggregator: self.aggregator,
            metrics: Arc::clone(&self.metrics),
            deadline: self.deadline,
            policy: self.policy,
        });

        let mut tasks = JoinSet::new();
        for worker_id in 0..self.workers {
            tasks.spawn(dispatch_worker(Arc::clone(&ctx), rx.clone(), worker_id));
        }
        debug!(
            mode = self.mode.as_str(),
            workers = self.workers,
            "Worker pool started"
        );

        PoolHandle {
            mode: self.mode,
            metrics: self.metrics,
            tasks,
        }
    }
}

/// Running pool; [`PoolHandle::join`] is the completion barrier
///
/// Dropping the handle aborts every worker.
pub struct PoolHandle {
    mode: RunMode,
    metrics: Arc<PoolMetrics>,
    tasks: JoinSet<RunningStats>,
}

/// What a joined pool reports back
#[derive(Debug, Clone, Default)]
pub struct PoolReport {
    /// Items pulled from the queue and handed to the transport
    pub dispatched: u64,
    /// Latency samples in milliseconds, merged across workers
    pub latency: RunningStats,
}

impl PoolHandle {
    pub fn metrics(&self) -> &Arc<PoolMetrics> {
        &self.metrics
    }

    /// Wait for every worker to finish
    #[instrument(name = "worker_pool_join", skip(self), fields(mode = self.mode.as_str()))]
    pub async fn join(mut self) -> PoolReport {
        let mut latency = RunningStats::default();
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(stats) => latency.merge(&stats),
                Err(e) => error!(error = %e, "Dispatch worker terminated abnormally"),
            }
        }
        observability::record_in_flight(self.mode.as_str(), 0);

        PoolReport {
            dispatched: self.metrics.dispatched_count(),
            latency,
        }
    }
}

#[instrument(name = "dispatch_worker_loop", skip(ctx, rx), fields(mode = ctx.mode.as_str()))]
async fn dispatch_worker<T>(
    ctx: Arc<WorkerContext<T>>,
    rx: Receiver<DispatchItem>,
    worker_id: usize,
) -> RunningStats
where
    T: Transport + Sync + 'static,
{
    let mut latency = RunningStats::default();

    loop {
        let next = match ctx.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = sleep_until(deadline) => break,
                next = rx.recv() => next,
            },
            None => rx.recv().await,
        };
        // Closed and drained
        let Ok(item) = next else { break };

        ctx.metrics.set_queue_len(rx.len());
        ctx.metrics.inc_dispatched_count();
        let in_flight = ctx.metrics.call_started();
        observability::record_in_flight(ctx.mode.as_str(), in_flight);

        let started = Instant::now();
        let outcome = ctx.call(&item).await;
        let elapsed = started.elapsed();

        ctx.metrics.call_finished();
        latency.push(elapsed.as_secs_f64() * 1000.0);
        observability::record_item_dispatched(ctx.mode.as_str(), outcome.is_ok(), elapsed);

        match outcome {
            Ok(()) => ctx.metrics.inc_success_count(),
            Err(e) => {
                ctx.metrics.inc_failure_count();
                observability::record_transport_failure(ctx.mode.as_str(), e.kind());
                warn!(
                    worker_id,
                    item_id = %item.id,
                    transport = ctx.transport.name(),
                    error = %e,
                    "Dispatch failed"
                );
                ctx.aggregator.record_failure(item.id);
            }
        }
    }

    debug!(worker_id, handled = latency.count(), "Dispatch worker stopped");
    latency
}

impl<T> WorkerContext<T>
where
    T: Transport + Sync + 'static,
{
    /// Exactly one transport call; a panic inside it becomes a failure
    async fn call(&self, item: &DispatchItem) -> Result<(), TransportError> {
        let call = AssertUnwindSafe(self.transport.dispatch_one(&self.url, &item.payload))
            .catch_unwind();

        let outcome = match (self.policy, self.deadline) {
            (DeadlinePolicy::Abort, Some(deadline)) => tokio::select! {
                outcome = call => outcome,
                _ = sleep_until(deadline) => return Err(TransportError::Aborted),
            },
            _ => call.await,
        };

        outcome.unwrap_or_else(|panic| {
            Err(TransportError::Panicked {
                message: panic_message(panic.as_ref()),
            })
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
