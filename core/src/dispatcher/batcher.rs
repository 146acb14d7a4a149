//! Dual-trigger batching loop between the intake queue and idle workers

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::channel::BatchConfig;
use crate::job::Job;
use crate::pending::PendingCount;
use crate::worker::Slot;

/// Why a batch was flushed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushReason {
    /// Batch reached the ceiling
    Full,
    /// Flush timer fired with jobs waiting
    Idle,
    /// Intake closed; remaining jobs flushed once
    Closing,
}

/// Counters kept by the dispatch loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Batches flushed, whatever the trigger
    pub batches_flushed: usize,

    /// Flushes triggered by the batch ceiling
    pub size_flushes: usize,

    /// Flushes triggered by the timer
    pub timer_flushes: usize,

    /// Jobs handed to a worker
    pub jobs_dispatched: usize,

    /// Jobs dropped because no worker could take them
    pub undelivered: usize,
}

/// Moves jobs from intake to workers in batches
pub(crate) struct DispatchLoop {
    intake_rx: mpsc::Receiver<Job>,
    pool_rx: mpsc::Receiver<Slot>,
    pending: PendingCount,
    config: BatchConfig,
    batch: Vec<Job>,
    stats: LoopStats,
}

impl DispatchLoop {
    pub(crate) fn new(
        intake_rx: mpsc::Receiver<Job>,
        pool_rx: mpsc::Receiver<Slot>,
        pending: PendingCount,
        config: BatchConfig,
    ) -> Self {
        Self {
            intake_rx,
            pool_rx,
            pending,
            config,
            batch: Vec::new(),
            stats: LoopStats::default(),
        }
    }

    /// Run until the intake is closed, then close the availability pool
    pub(crate) async fn run(mut self) -> LoopStats {
        let mut ticker = tokio::time::interval(self.config.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately.
        ticker.tick().await;

        tracing::debug!(
            max_batch = self.config.max_batch,
            flush_interval_ms = self.config.flush_interval.as_millis() as u64,
            "Dispatch loop started"
        );

        loop {
            tokio::select! {
                received = self.intake_rx.recv() => match received {
                    Some(job) => {
                        self.batch.push(job);
                        if self.batch.len() >= self.config.max_batch {
                            self.flush(FlushReason::Full).await;
                            ticker.reset();
                        }
                    }
                    None => {
                        self.flush(FlushReason::Closing).await;
                        break;
                    }
                },
                _ = ticker.tick() => {
                    if !self.batch.is_empty() {
                        self.flush(FlushReason::Idle).await;
                    }
                }
            }
        }

        // Idle workers holding a parked slot see it dropped and stop; busy
        // workers fail to register again.
        self.pool_rx.close();
        while self.pool_rx.try_recv().is_ok() {}

        tracing::debug!(
            batches = self.stats.batches_flushed,
            dispatched = self.stats.jobs_dispatched,
            undelivered = self.stats.undelivered,
            "Dispatch loop finished"
        );

        self.stats
    }

    async fn flush(&mut self, reason: FlushReason) {
        if self.batch.is_empty() {
            return;
        }

        let batch = std::mem::take(&mut self.batch);
        tracing::debug!(batch_size = batch.len(), reason = ?reason, "Flushing batch");

        self.stats.batches_flushed += 1;
        match reason {
            FlushReason::Full => self.stats.size_flushes += 1,
            FlushReason::Idle => self.stats.timer_flushes += 1,
            FlushReason::Closing => {}
        }

        for job in batch {
            self.deliver(job).await;
        }
    }

    /// Hand `job` to the next idle worker
    async fn deliver(&mut self, mut job: Job) {
        loop {
            let Some(slot) = self.pool_rx.recv().await else {
                tracing::warn!(job_id = job.id(), "No worker left to run job, dropping it");
                self.stats.undelivered += 1;
                self.pending.done();
                return;
            };

            match slot.send(job) {
                Ok(()) => {
                    self.stats.jobs_dispatched += 1;
                    return;
                }
                // Worker went away after registering; try the next one.
                Err(returned) => job = returned,
            }
        }
    }
}
