//! Worker module for executing jobs
//!
//! A Worker is a long-lived tokio task with a simple loop:
//! **register slot -> receive job -> execute -> release -> repeat**.
//!
//! An idle worker parks a one-shot slot in the dispatcher's availability
//! pool. The dispatch loop claims a slot, sends exactly one job through it,
//! and the worker runs that job to completion before registering again, so a
//! worker never holds two jobs at once. Every execution releases one entry of
//! the shared pending-count, even when the job panics.
//!
//! A worker terminates when the pool is closed (registration fails) or when
//! its parked slot is dropped without a job.
//!
//! # Example
//!
//! ```ignore
//! use dizzy_core::worker::{Slot, WorkerBuilder};
//!
//! let (pool_tx, pool_rx) = tokio::sync::mpsc::channel::<Slot>(workers);
//! let worker = WorkerBuilder::new(0)
//!     .requester(requester)
//!     .pool(pool_tx)
//!     .pending(pending)
//!     .build()?;
//!
//! let stats = worker.run().await;
//! println!("Completed: {}", stats.completed);
//! ```

mod builder;
mod executor;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::{Slot, Worker};
pub use stats::WorkerStats;
