//! Result aggregation from multiple workers

use std::time::Duration;

use crate::worker::WorkerStats;

use super::batcher::LoopStats;

/// Aggregated statistics from all workers
#[derive(Debug, Clone, Default)]
pub struct AggregatedStats {
    /// Number of workers that reported stats
    pub total_workers: usize,

    /// Total successful jobs
    pub total_completed: usize,

    /// Total failed jobs
    pub total_failed: usize,

    /// Total jobs that panicked
    pub total_panicked: usize,

    /// Overall jobs per second
    pub jobs_per_second: f64,
}

impl AggregatedStats {
    /// Total jobs executed (completed + failed + panicked)
    pub fn total_jobs(&self) -> usize {
        self.total_completed + self.total_failed + self.total_panicked
    }

    /// Get the success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total_jobs();
        if total > 0 {
            self.total_completed as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedStats {
    if stats.is_empty() {
        return AggregatedStats::default();
    }

    let mut totals = WorkerStats::new();
    for worker in stats {
        totals.merge(worker);
    }

    // Use the maximum elapsed time across all workers
    let longest = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    let secs = longest.as_secs_f64();
    let jobs_per_second = if secs > 0.0 {
        totals.total_jobs() as f64 / secs
    } else {
        0.0
    };

    AggregatedStats {
        total_workers: stats.len(),
        total_completed: totals.completed,
        total_failed: totals.failed,
        total_panicked: totals.panicked,
        jobs_per_second,
    }
}

/// What `Dispatcher::wait` returns
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    /// Per-worker stats rolled up
    pub workers: AggregatedStats,

    /// Dispatch loop counters
    pub dispatch: LoopStats,

    /// Time from `run` to the end of `wait`
    pub elapsed: Duration,
}

impl DispatchSummary {
    /// Jobs that ran on a worker
    pub fn jobs_executed(&self) -> usize {
        self.workers.total_jobs()
    }

    /// Jobs that never reached a worker
    pub fn undelivered(&self) -> usize {
        self.dispatch.undelivered
    }

    /// Jobs reported as failed, including panics
    pub fn jobs_failed(&self) -> usize {
        self.workers.total_failed + self.workers.total_panicked
    }
}
