//! Builder pattern for Dispatcher construction

use std::time::Duration;

use crate::config::{DispatchConfig, PoolSizing};
use crate::error::Result;

use super::executor::Dispatcher;

/// Builder for creating a Dispatcher with validated configuration
///
/// # Example
///
/// ```ignore
/// let dispatcher = DispatcherBuilder::new()
///     .worker_count(8)
///     .queue_capacity(1000)
///     .batch_size(300)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DispatcherBuilder {
    config: DispatchConfig,
}

impl DispatcherBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the full dispatch configuration
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Size workers and intake for `job_count` jobs, keeping batch settings
    pub fn for_jobs(mut self, job_count: usize, sizing: &PoolSizing) -> Self {
        self.config.worker_count = sizing.worker_count(job_count);
        self.config.queue_capacity = sizing.queue_capacity(job_count);
        self
    }

    /// Set the number of workers
    pub fn worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    /// Set the intake queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the batch ceiling
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch.max_batch = size;
        self
    }

    /// Set the idle flush interval
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.batch.flush_interval = interval;
        self
    }

    /// Build the dispatcher
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn build(self) -> Result<Dispatcher> {
        Dispatcher::new(self.config)
    }
}
