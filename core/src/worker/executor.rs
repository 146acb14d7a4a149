//! Worker execution loop

use crate::job::{Job, JobOutcome};
use crate::pending::PendingCount;
use crate::traits::Requester;

use super::stats::WorkerStats;

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// One-shot inbound hand-off registered by an idle worker
pub type Slot = oneshot::Sender<Job>;

/// Worker runs jobs one at a time: register -> receive -> execute -> repeat
///
/// Workers share the Requester via Arc and are fed by the dispatch loop
/// through the availability pool.
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// Requester (shared across workers via Arc)
    requester: Arc<dyn Requester>,

    /// Availability pool the worker parks its slot in
    pool_tx: mpsc::Sender<Slot>,

    /// Outstanding-job counter released after each job
    pending: PendingCount,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        requester: Arc<dyn Requester>,
        pool_tx: mpsc::Sender<Slot>,
        pending: PendingCount,
    ) -> Self {
        Self {
            id,
            requester,
            pool_tx,
            pending,
        }
    }

    /// Run the worker loop
    ///
    /// Returns WorkerStats once the pool is closed or the parked slot is
    /// dropped.
    pub async fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::new();
        stats.start();

        tracing::debug!(worker_id = self.id, "Worker started");

        loop {
            let (slot_tx, slot_rx) = oneshot::channel();

            if self.pool_tx.send(slot_tx).await.is_err() {
                tracing::debug!(worker_id = self.id, "Pool closed, worker stopping");
                break;
            }

            let job = match slot_rx.await {
                Ok(job) => job,
                Err(_) => {
                    tracing::debug!(worker_id = self.id, "Slot dropped, worker stopping");
                    break;
                }
            };

            self.execute_one(job, &mut stats).await;
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            completed = stats.completed,
            failed = stats.failed,
            panicked = stats.panicked,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        stats
    }

    /// Execute a single job and release its pending entry
    async fn execute_one(&self, job: Job, stats: &mut WorkerStats) {
        let _guard = self.pending.guard();
        let job_id = job.id();

        tracing::debug!(worker_id = self.id, job_id, "Job started");

        let outcome = AssertUnwindSafe(job.execute(Arc::clone(&self.requester)))
            .catch_unwind()
            .await;

        match outcome {
            Ok(JobOutcome::Succeeded) => stats.record_success(),
            Ok(JobOutcome::Failed) => stats.record_failure(),
            Err(panic) => {
                stats.record_panic();
                tracing::error!(
                    worker_id = self.id,
                    job_id,
                    panic = panic_message(panic.as_ref()),
                    "Job panicked"
                );
            }
        }
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("method", &self.requester.method())
            .field("pending", &self.pending.get())
            .finish()
    }
}
