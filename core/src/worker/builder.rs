//! Builder pattern for Worker construction

use crate::error::{DispatchError, Result};
use crate::pending::PendingCount;
use crate::traits::Requester;

use super::executor::{Slot, Worker};

use std::sync::Arc;
use tokio::sync::mpsc;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .requester(requester)
///     .pool(pool_tx)
///     .pending(pending)
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    requester: Option<Arc<dyn Requester>>,
    pool_tx: Option<mpsc::Sender<Slot>>,
    pending: Option<PendingCount>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            requester: None,
            pool_tx: None,
            pending: None,
        }
    }

    /// Set the shared requester
    pub fn requester(mut self, requester: Arc<dyn Requester>) -> Self {
        self.requester = Some(requester);
        self
    }

    /// Set the availability pool the worker registers its slot into
    pub fn pool(mut self, pool_tx: mpsc::Sender<Slot>) -> Self {
        self.pool_tx = Some(pool_tx);
        self
    }

    /// Set the pending-count released after every job
    pub fn pending(mut self, pending: PendingCount) -> Self {
        self.pending = Some(pending);
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> Result<Worker> {
        let requester = self
            .requester
            .ok_or(DispatchError::missing_config("requester"))?;
        let pool_tx = self.pool_tx.ok_or(DispatchError::missing_config("pool"))?;
        let pending = self
            .pending
            .ok_or(DispatchError::missing_config("pending"))?;

        Ok(Worker::new(self.id, requester, pool_tx, pending))
    }
}
