//! Worker-pool dispatcher
//!
//! The Dispatcher coordinates one run of the engine:
//! - Spawning a fixed set of workers bound to one shared requester
//! - Batching submitted jobs from a bounded intake queue
//! - Handing each job to exactly one idle worker
//! - Tracking outstanding jobs and shutting everything down once they finish
//!
//! # Example
//!
//! ```ignore
//! use dizzy_core::{jobs_from_requests, DispatcherBuilder, PoolSizing};
//!
//! let jobs = jobs_from_requests(word_list.to_requests(url));
//! let mut dispatcher = DispatcherBuilder::new()
//!     .for_jobs(jobs.len(), &PoolSizing::default())
//!     .build()?;
//!
//! dispatcher.run(requester)?;
//! dispatcher.submit_all(jobs).await?;
//! let summary = dispatcher.wait().await?;
//! ```

mod aggregator;
mod batcher;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, AggregatedStats, DispatchSummary};
pub use batcher::{FlushReason, LoopStats};
pub use builder::DispatcherBuilder;
pub use executor::{Dispatcher, DispatcherState};
