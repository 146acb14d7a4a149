//! Batching configuration for the dispatch loop

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest number of jobs forwarded to workers in one flush
pub const DEFAULT_MAX_BATCH: usize = 300;

/// Idle period after which a partial batch is flushed
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

/// How the dispatch loop groups intake jobs before handing them to workers
///
/// A batch is flushed when it reaches `max_batch` jobs or when
/// `flush_interval` elapses with at least one job waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Batch size ceiling
    pub max_batch: usize,

    /// Idle flush timer
    pub flush_interval: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch: DEFAULT_MAX_BATCH,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl BatchConfig {
    /// Set the batch size ceiling
    pub fn with_max_batch(mut self, size: usize) -> Self {
        self.max_batch = size;
        self
    }

    /// Set the idle flush interval
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }
}
