//! dizzy-core: concurrent HTTP path probing engine
//!
//! This crate provides the building blocks used by the `dizzy` binary:
//!
//! - Probe data structures (requests, responses)
//! - Core traits (Requester, ProbeObserver)
//! - Jobs, workers and the batching worker-pool dispatcher
//! - The reqwest-backed HTTP requester
//! - Word list loading, configuration and error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod job;
pub mod pending;
pub mod request;
pub mod response;
pub mod traits;
pub mod wordlist;
pub mod worker;

pub use channel::BatchConfig;
pub use config::{
    ConfigError, DispatchConfig, OutputFilter, PoolSizing, RequesterConfig, DEFAULT_METHOD,
    DEFAULT_TIMEOUT, MAX_CAPACITY,
};
pub use dispatcher::{
    AggregatedStats, DispatchSummary, Dispatcher, DispatcherBuilder, DispatcherState, LoopStats,
};
pub use error::*;
pub use http::{is_valid_method, HttpRequester, RequesterError, ALLOWED_METHODS};
pub use job::{jobs_from_requests, Job, JobId, JobOutcome};
pub use pending::PendingCount;
pub use request::*;
pub use response::*;
pub use traits::*;
pub use wordlist::{WordList, WordListError};
pub use worker::{Worker, WorkerBuilder, WorkerStats};
