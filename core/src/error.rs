//! Error types for dizzy-core

use thiserror::Error;

/// Dispatch engine error
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Configuration rejected by validation
    #[error("configuration error: {0}")]
    Config(String),

    /// A builder was finalized without a required field
    #[error("missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// `run` was called on a dispatcher that is already running
    #[error("dispatcher is already running")]
    AlreadyRunning,

    /// `wait` was called before `run` while jobs were still pending
    #[error("dispatcher was never started but {pending} job(s) are pending")]
    NotRunning {
        /// Jobs submitted but never dispatched
        pending: usize,
    },

    /// The intake queue no longer accepts jobs
    #[error("intake queue is closed")]
    IntakeClosed,

    /// A spawned task could not be joined
    #[error("task failed to join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl DispatchError {
    /// Error for a builder field that was never set
    pub fn missing_config(field: &'static str) -> Self {
        DispatchError::MissingConfig(field)
    }

    /// Error for a configuration that failed validation
    pub fn config(message: impl Into<String>) -> Self {
        DispatchError::Config(message.into())
    }
}

impl From<crate::config::ConfigError> for DispatchError {
    fn from(err: crate::config::ConfigError) -> Self {
        DispatchError::Config(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_names_field() {
        let err = DispatchError::missing_config("requester");
        assert!(err.to_string().contains("requester"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: DispatchError =
            crate::config::ConfigError::InvalidWorkerCount("zero".into()).into();
        assert!(matches!(err, DispatchError::Config(_)));
        assert!(err.to_string().contains("zero"));
    }

    #[test]
    fn test_not_running_reports_pending() {
        let err = DispatchError::NotRunning { pending: 4 };
        assert_eq!(
            err.to_string(),
            "dispatcher was never started but 4 job(s) are pending"
        );
    }
}
