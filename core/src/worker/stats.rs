//! Worker statistics tracking

use std::time::Instant;

/// Statistics tracked by each worker
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Number of jobs that succeeded
    pub completed: usize,

    /// Number of jobs that reported a failure
    pub failed: usize,

    /// Number of jobs that panicked
    pub panicked: usize,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Total jobs executed, whatever the outcome
    pub fn total_jobs(&self) -> usize {
        self.completed + self.failed + self.panicked
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Record a successful job
    pub fn record_success(&mut self) {
        self.completed += 1;
    }

    /// Record a failed job
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Record a job that panicked
    pub fn record_panic(&mut self) {
        self.panicked += 1;
    }

    /// Merge stats from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.completed += other.completed;
        self.failed += other.failed;
        self.panicked += other.panicked;
    }
}
