//! Dispatcher lifecycle: run, submit, wait

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::DispatchConfig;
use crate::error::{DispatchError, Result};
use crate::job::Job;
use crate::pending::PendingCount;
use crate::traits::Requester;
use crate::worker::{Slot, WorkerBuilder, WorkerStats};

use super::aggregator::{aggregate_worker_stats, DispatchSummary};
use super::batcher::{DispatchLoop, LoopStats};

/// Lifecycle of a dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// Built; jobs may be queued but nothing runs yet
    Constructed,
    /// Workers and dispatch loop are running
    Running,
    /// Every job finished; intake closed, tasks being joined
    Draining,
    /// All tasks joined
    Stopped,
}

/// Dispatcher owns the intake queue, the workers and the pending-count
///
/// Jobs submitted before [`run`](Self::run) stay queued until it is called;
/// with a full intake, `submit` waits for room, so call `run` first when the
/// queue is smaller than the job count.
pub struct Dispatcher {
    /// Dispatch configuration
    config: DispatchConfig,

    /// Current lifecycle state
    state: DispatcherState,

    /// Intake sender; dropped by `wait` to close the intake
    intake_tx: mpsc::Sender<Job>,

    /// Intake receiver, moved into the dispatch loop by `run`
    intake_rx: Option<mpsc::Receiver<Job>>,

    /// Jobs submitted and not yet completed
    pending: PendingCount,

    /// Worker task handles
    workers: Vec<JoinHandle<WorkerStats>>,

    /// Dispatch loop task handle
    dispatch_loop: Option<JoinHandle<LoopStats>>,

    /// Set by `run`
    started_at: Option<Instant>,
}

impl Dispatcher {
    /// Create a new dispatcher
    ///
    /// Use `DispatcherBuilder` for a more ergonomic construction.
    pub fn new(config: DispatchConfig) -> Result<Self> {
        config.validate()?;

        let (intake_tx, intake_rx) = mpsc::channel(config.queue_capacity);

        Ok(Self {
            config,
            state: DispatcherState::Constructed,
            intake_tx,
            intake_rx: Some(intake_rx),
            pending: PendingCount::new(),
            workers: Vec::new(),
            dispatch_loop: None,
            started_at: None,
        })
    }

    /// Get the dispatch configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> DispatcherState {
        self.state
    }

    /// Jobs submitted and not yet completed
    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    /// Start the workers and the dispatch loop
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` if called more than once.
    pub fn run(&mut self, requester: Arc<dyn Requester>) -> Result<()> {
        let intake_rx = match (self.state, self.intake_rx.take()) {
            (DispatcherState::Constructed, Some(rx)) => rx,
            _ => return Err(DispatchError::AlreadyRunning),
        };

        let worker_count = self.config.worker_count;
        tracing::info!(
            workers = worker_count,
            queue_capacity = self.config.queue_capacity,
            max_batch = self.config.batch.max_batch,
            method = requester.method(),
            "Starting dispatcher"
        );

        // Each worker parks at most one slot, so the pool never fills up.
        let (pool_tx, pool_rx) = mpsc::channel::<Slot>(worker_count);

        self.workers.reserve(worker_count);
        for worker_id in 0..worker_count {
            let worker = WorkerBuilder::new(worker_id)
                .requester(Arc::clone(&requester))
                .pool(pool_tx.clone())
                .pending(self.pending.clone())
                .build()?;

            self.workers.push(tokio::spawn(worker.run()));
        }
        drop(pool_tx);

        let dispatch_loop =
            DispatchLoop::new(intake_rx, pool_rx, self.pending.clone(), self.config.batch);
        self.dispatch_loop = Some(tokio::spawn(dispatch_loop.run()));

        self.started_at = Some(Instant::now());
        self.state = DispatcherState::Running;
        Ok(())
    }

    /// Queue one job, waiting while the intake is full
    ///
    /// # Errors
    ///
    /// Returns `IntakeClosed` if the dispatch loop is gone; the job is not
    /// counted as pending in that case.
    pub async fn submit(&self, job: Job) -> Result<()> {
        let job_id = job.id();
        self.pending.add(1);

        if self.intake_tx.send(job).await.is_err() {
            self.pending.done();
            return Err(DispatchError::IntakeClosed);
        }

        tracing::debug!(job_id, "Submitted job");
        Ok(())
    }

    /// Queue every job in order
    pub async fn submit_all<I>(&self, jobs: I) -> Result<()>
    where
        I: IntoIterator<Item = Job>,
    {
        for job in jobs {
            self.submit(job).await?;
        }
        Ok(())
    }

    /// Block until every submitted job has completed, then shut down
    ///
    /// Closes the intake, joins the dispatch loop and all workers, and
    /// returns the aggregated statistics.
    ///
    /// # Errors
    ///
    /// Returns `NotRunning` if `run` was never called but jobs are pending,
    /// and `Join` if the dispatch loop task failed.
    pub async fn wait(mut self) -> Result<DispatchSummary> {
        if self.state == DispatcherState::Constructed {
            let pending = self.pending.get();
            if pending > 0 {
                return Err(DispatchError::NotRunning { pending });
            }
            self.state = DispatcherState::Stopped;
            return Ok(DispatchSummary::default());
        }

        self.pending.wait_zero().await;

        self.state = DispatcherState::Draining;
        tracing::debug!("All jobs completed, draining dispatcher");

        let Self {
            intake_tx,
            workers,
            dispatch_loop,
            started_at,
            ..
        } = self;
        drop(intake_tx);

        let dispatch = match dispatch_loop {
            Some(handle) => handle.await?,
            None => LoopStats::default(),
        };

        let mut results = Vec::with_capacity(workers.len());
        for (idx, handle) in workers.into_iter().enumerate() {
            match handle.await {
                Ok(stats) => results.push(stats),
                Err(e) => {
                    tracing::error!(worker_id = idx, error = %e, "Worker task failed");
                }
            }
        }

        let summary = DispatchSummary {
            workers: aggregate_worker_stats(&results),
            dispatch,
            elapsed: started_at.map(|s| s.elapsed()).unwrap_or_default(),
        };

        tracing::info!(
            elapsed_secs = summary.elapsed.as_secs_f64(),
            total_completed = summary.workers.total_completed,
            total_failed = summary.workers.total_failed,
            total_panicked = summary.workers.total_panicked,
            batches = summary.dispatch.batches_flushed,
            undelivered = summary.dispatch.undelivered,
            "Dispatcher stopped"
        );

        Ok(summary)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("pending", &self.pending.get())
            .field("workers", &self.workers.len())
            .finish()
    }
}
