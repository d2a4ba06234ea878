//! RunController - manual batches, count-bounded and duration-bounded load runs

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::time::timeout_at;
use tracing::{debug, error, info, instrument, warn, Span};

use contracts::{
    DeadlinePolicy, DispatchItem, GenerationError, LoadGenConfig, PayloadSource, RecordKind,
    RunResult, TargetsConfig, Transport,
};
use observability::RunningStats;

use crate::aggregator::FailureAggregator;
use crate::error::RunError;
use crate::pool::{RunMode, WorkerPool};
use crate::transports::HttpTransport;

/// Controller settings, resolved from [`LoadGenConfig`]
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Gateway receiving manual batches
    pub manual_url: String,
    pub manual_workers: usize,
    pub load_workers: usize,
    /// Load targets, picked by the source's record kind
    pub targets: TargetsConfig,
    /// Items generated per chunk in duration-bounded runs
    pub chunk_size: usize,
    pub deadline_policy: DeadlinePolicy,
}

impl ControllerConfig {
    pub fn from_config(config: &LoadGenConfig) -> Self {
        Self {
            manual_url: config.manual.url.clone(),
            manual_workers: config.manual.workers,
            load_workers: config.load.workers,
            targets: config.targets.clone(),
            chunk_size: config.load.effective_chunk_size(),
            deadline_policy: config.load.deadline_policy,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from_config(&LoadGenConfig::default())
    }
}

/// Owns the transport, and the payload source for load runs
///
/// Manual-only controllers carry no source; see [`RunController::manual`].
pub struct RunController<T, S = ()> {
    config: ControllerConfig,
    transport: Arc<T>,
    source: Arc<Mutex<S>>,
}

impl<S: PayloadSource + 'static> RunController<HttpTransport, S> {
    /// Controller sending over HTTP, tuned from the `[transport]` section
    pub fn from_config(config: &LoadGenConfig, source: S) -> Result<Self, RunError> {
        let transport = HttpTransport::from_config(&config.transport)?;
        Ok(Self::new(
            ControllerConfig::from_config(config),
            Arc::new(transport),
            source,
        ))
    }
}

impl<T> RunController<T>
where
    T: Transport + Sync + 'static,
{
    /// Controller for caller-supplied batches only
    pub fn manual(config: ControllerConfig, transport: Arc<T>) -> Self {
        Self::with_source(config, transport, ())
    }
}

impl<T, S> RunController<T, S>
where
    T: Transport + Sync + 'static,
{
    fn with_source(config: ControllerConfig, transport: Arc<T>, source: S) -> Self {
        Self {
            config,
            transport,
            source: Arc::new(Mutex::new(source)),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Dispatch a caller-supplied batch to the manual URL
    ///
    /// Succeeds only when every item was sent. An empty batch succeeds
    /// without starting any worker.
    #[instrument(name = "run_controller_manual", skip(self, items), fields(items = items.len()))]
    pub async fn run_manual(&self, items: Vec<DispatchItem>) -> Result<(), RunError> {
        if items.is_empty() {
            info!("Empty manual batch, nothing to dispatch");
            return Ok(());
        }
        ensure_workers("manual.workers", self.config.manual_workers)?;

        let result = self
            .dispatch_fixed(
                RunMode::Manual,
                &self.config.manual_url,
                self.config.manual_workers,
                items,
            )
            .await;

        if result.failed.is_empty() {
            Ok(())
        } else {
            Err(RunError::PartialFailure {
                failed_ids: result.failed,
                total: result.total,
            })
        }
    }

    /// Enqueue every item, close the queue, then wait for the pool
    async fn dispatch_fixed(
        &self,
        mode: RunMode,
        url: &str,
        workers: usize,
        items: Vec<DispatchItem>,
    ) -> RunResult {
        let aggregator = Arc::new(FailureAggregator::new());
        let (tx, rx) = async_channel::bounded(items.len().max(1));
        let pool = WorkerPool::new(
            mode,
            workers,
            url,
            Arc::clone(&self.transport),
            Arc::clone(&aggregator),
        );

        let started = Instant::now();
        for item in items {
            // Capacity matches the batch and `rx` is still held, so this never waits
            if let Err(e) = tx.send(item).await {
                error!(item_id = %e.into_inner().id, "Dispatch queue closed during enqueue");
                break;
            }
        }
        drop(tx);

        let report = pool.spawn(rx).join().await;
        let result = RunResult::new(report.dispatched, aggregator.take(), started.elapsed());
        log_run(mode, &result, &report.latency);
        result
    }
}

impl<T, S> RunController<T, S>
where
    T: Transport + Sync + 'static,
    S: PayloadSource + 'static,
{
    pub fn new(config: ControllerConfig, transport: Arc<T>, source: S) -> Self {
        Self::with_source(config, transport, source)
    }

    /// Exclusive access to the source
    ///
    /// Blocks while a generation abandoned at a deadline is still running.
    pub fn source(&self) -> MutexGuard<'_, S> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate and dispatch exactly `count` items
    #[instrument(name = "run_controller_load", skip(self), fields(kind = tracing::field::Empty))]
    pub async fn run_load(&mut self, count: usize) -> Result<RunResult, RunError> {
        if count == 0 {
            return Err(RunError::invalid_argument("count", "must be greater than 0"));
        }
        ensure_workers("load.workers", self.config.load_workers)?;

        let (kind, items) = self.generate(count).await?;
        Span::current().record("kind", kind.as_str());
        let url = self.config.targets.url_for(kind);

        Ok(self
            .dispatch_fixed(RunMode::Load, url, self.config.load_workers, items)
            .await)
    }

    /// Generate and dispatch items in chunks until `duration` elapses
    ///
    /// Chunks after the first are generated off the runtime and raced against
    /// the deadline, so a slow source cannot hold the run open.
    #[instrument(
        name = "run_controller_load_for",
        skip(self),
        fields(kind = tracing::field::Empty, policy = ?self.config.deadline_policy)
    )]
    pub async fn run_load_for(&mut self, duration: Duration) -> Result<RunResult, RunError> {
        if duration.is_zero() {
            return Err(RunError::invalid_argument("duration", "must be greater than 0"));
        }
        ensure_workers("load.workers", self.config.load_workers)?;

        let chunk_size = self.config.chunk_size.max(1);
        let (kind, mut chunk) = self.generate(chunk_size).await?;
        Span::current().record("kind", kind.as_str());

        let aggregator = Arc::new(FailureAggregator::new());
        let (tx, rx) = async_channel::bounded(chunk_size);

        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + duration;
        let pool = WorkerPool::new(
            RunMode::Load,
            self.config.load_workers,
            self.config.targets.url_for(kind),
            Arc::clone(&self.transport),
            Arc::clone(&aggregator),
        )
        .with_deadline(deadline, self.config.deadline_policy);
        let handle = pool.spawn(rx);

        let mut generation_error = None;
        'produce: loop {
            for item in chunk {
                match timeout_at(deadline, tx.send(item)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(_)) => {
                        warn!("All workers exited, stopping producer");
                        break 'produce;
                    }
                    Err(_) => break 'produce,
                }
            }
            if tokio::time::Instant::now() >= deadline {
                break;
            }
            match timeout_at(deadline, self.generate(chunk_size)).await {
                Ok(Ok((_, next))) => chunk = next,
                Ok(Err(e)) => {
                    error!(error = %e, "Generation failed mid-run, draining queue");
                    generation_error = Some(e);
                    break;
                }
                Err(_) => {
                    debug!("Deadline reached during generation, abandoning chunk");
                    break;
                }
            }
        }
        drop(tx);

        let report = handle.join().await;
        let result = RunResult::new(report.dispatched, aggregator.take(), started.elapsed());
        log_run(RunMode::Load, &result, &report.latency);

        match generation_error {
            Some(e) => Err(e.into()),
            None => Ok(result),
        }
    }

    /// Generate `count` items on the blocking pool
    ///
    /// Dropping the returned future detaches the generation; the source stays
    /// locked until it finishes.
    async fn generate(
        &self,
        count: usize,
    ) -> Result<(RecordKind, Vec<DispatchItem>), GenerationError> {
        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || -> Result<_, GenerationError> {
            let mut source = source.lock().unwrap_or_else(PoisonError::into_inner);
            let items = source.generate(count)?;
            Ok((source.kind(), items))
        })
        .await
        .map_err(|e| GenerationError::Other(format!("generator task failed: {e}")))?
    }
}

fn ensure_workers(field: &str, workers: usize) -> Result<(), RunError> {
    if workers == 0 {
        return Err(RunError::invalid_argument(field, "must be greater than 0"));
    }
    Ok(())
}

fn log_run(mode: RunMode, result: &RunResult, latency: &RunningStats) {
    info!(
        mode = mode.as_str(),
        total = result.total,
        failed = result.failed.len(),
        duration_ms = result.duration.as_millis() as u64,
        throughput = result.throughput,
        latency_ms = %latency.summary(),
        "Run completed"
    );
    observability::record_run_completed(mode.as_str(), result);
}
