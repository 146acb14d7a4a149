//! Dispatcher and requester configuration

use crate::channel::BatchConfig;
use crate::response::ProbeResponse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Timeout used when none (or zero) is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Method used when none is configured
pub const DEFAULT_METHOD: &str = "GET";

/// Largest worker count or queue capacity a bounded channel accepts
pub const MAX_CAPACITY: usize = tokio::sync::Semaphore::MAX_PERMITS;

// ============================================================================
// Dispatch configuration
// ============================================================================

/// Dispatcher sizing and batching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Number of worker tasks
    pub worker_count: usize,

    /// Intake queue capacity; `submit` waits once it is full
    pub queue_capacity: usize,

    /// Batch ceiling and idle flush timer
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_count: 1,
            queue_capacity: 1,
            batch: BatchConfig::default(),
        }
    }
}

impl DispatchConfig {
    /// Create a config with explicit worker count and queue capacity
    pub fn new(worker_count: usize, queue_capacity: usize) -> Self {
        Self {
            worker_count,
            queue_capacity,
            ..Default::default()
        }
    }

    /// Size the pool for `job_count` jobs using `sizing`
    pub fn for_jobs(job_count: usize, sizing: &PoolSizing) -> Self {
        Self::new(
            sizing.worker_count(job_count),
            sizing.queue_capacity(job_count),
        )
    }

    /// Set the worker count
    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Set the intake queue capacity
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the batching behaviour
    pub fn with_batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidWorkerCount(
                "worker count must be at least 1".into(),
            ));
        }

        if self.worker_count > MAX_CAPACITY {
            return Err(ConfigError::InvalidWorkerCount(format!(
                "worker count must be at most {}",
                MAX_CAPACITY
            )));
        }

        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity(
                "queue capacity must be at least 1".into(),
            ));
        }

        if self.queue_capacity > MAX_CAPACITY {
            return Err(ConfigError::InvalidQueueCapacity(format!(
                "queue capacity must be at most {}",
                MAX_CAPACITY
            )));
        }

        if self.batch.max_batch == 0 {
            return Err(ConfigError::InvalidBatch(
                "batch ceiling must be at least 1".into(),
            ));
        }

        if self.batch.flush_interval.is_zero() {
            return Err(ConfigError::InvalidBatch(
                "flush interval must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Load-scaled pool sizing
///
/// Workers are `round(jobs / divisor)` and the intake holds every job, so
/// submitting the whole word list up front never blocks. Both values are
/// clamped to at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolSizing {
    /// Jobs per worker
    pub divisor: f64,
}

impl Default for PoolSizing {
    fn default() -> Self {
        Self { divisor: 3.0 }
    }
}

impl PoolSizing {
    /// Sizing with a custom jobs-per-worker divisor
    pub fn new(divisor: f64) -> Self {
        Self { divisor }
    }

    /// Worker count for `job_count` jobs
    pub fn worker_count(&self, job_count: usize) -> usize {
        if self.divisor <= 0.0 {
            return job_count.max(1);
        }
        ((job_count as f64 / self.divisor).round() as usize).max(1)
    }

    /// Intake capacity for `job_count` jobs
    pub fn queue_capacity(&self, job_count: usize) -> usize {
        job_count.max(1)
    }
}

// ============================================================================
// Requester configuration
// ============================================================================

/// Which outcomes are passed on to the observer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFilter {
    /// Suppress 2xx outcomes
    pub failures_only: bool,

    /// Suppress outcomes whose body has exactly this length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_length: Option<usize>,
}

impl OutputFilter {
    /// Whether `response` should be reported
    pub fn shows(&self, response: &ProbeResponse) -> bool {
        if self.failures_only && response.is_success() {
            return false;
        }
        self.exclude_length != Some(response.body_length)
    }
}

/// Settings shared by every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequesterConfig {
    /// Per-request deadline covering headers and body
    pub timeout: Duration,

    /// HTTP method
    pub method: String,

    /// Headers applied to every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Output filter
    #[serde(default)]
    pub filter: OutputFilter,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            method: DEFAULT_METHOD.to_string(),
            headers: BTreeMap::new(),
            filter: OutputFilter::default(),
        }
    }
}

impl RequesterConfig {
    /// Create a config; call [`validated`](Self::validated) before use
    pub fn new(
        timeout: Duration,
        method: impl Into<String>,
        headers: BTreeMap<String, String>,
        failures_only: bool,
    ) -> Self {
        Self {
            timeout,
            method: method.into(),
            headers,
            filter: OutputFilter {
                failures_only,
                exclude_length: None,
            },
        }
    }

    /// Suppress outcomes with this body length
    pub fn with_excluded_length(mut self, length: Option<usize>) -> Self {
        self.filter.exclude_length = length;
        self
    }

    /// Substitute documented defaults for a zero timeout or an empty method
    ///
    /// Each substitution logs a warning. The method itself is checked per
    /// request, not here.
    pub fn validated(mut self) -> Self {
        if self.timeout.is_zero() {
            tracing::warn!(
                default_secs = DEFAULT_TIMEOUT.as_secs(),
                "Timeout of zero is not allowed, using the default"
            );
            self.timeout = DEFAULT_TIMEOUT;
        }

        if self.method.trim().is_empty() {
            tracing::warn!(
                default = DEFAULT_METHOD,
                "No HTTP method given, using the default"
            );
            self.method = DEFAULT_METHOD.to_string();
        }

        self
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(String),

    /// Invalid queue capacity
    #[error("Invalid queue capacity: {0}")]
    InvalidQueueCapacity(String),

    /// Invalid batching settings
    #[error("Invalid batch settings: {0}")]
    InvalidBatch(String),
}
