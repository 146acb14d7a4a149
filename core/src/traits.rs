//! Core traits for requesters and outcome observers
//!
//! Workers only see these traits; the HTTP implementation lives in
//! [`crate::http`] and tests substitute their own.

use crate::request::ProbeRequest;
use crate::response::ProbeResult;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

// ============================================================================
// Requester Trait
// ============================================================================

/// Shared invocation policy that turns one request into one outcome
///
/// A single instance is shared read-only by every worker, so implementations
/// must not carry per-call mutable state.
#[async_trait]
pub trait Requester: Send + Sync {
    /// HTTP method applied to every request
    fn method(&self) -> &str;

    /// Perform exactly one invocation for `request`
    async fn invoke(&self, request: &ProbeRequest) -> ProbeResult;
}

// ============================================================================
// Observer Trait
// ============================================================================

/// Sink for probe outcomes that pass the output filter
///
/// Called concurrently from every worker.
pub trait ProbeObserver: Send + Sync {
    /// Receive one outcome produced with `method`
    fn on_outcome(&self, method: &str, outcome: &ProbeResult);
}

/// Observer that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProbeObserver for NoopObserver {
    fn on_outcome(&self, _method: &str, _outcome: &ProbeResult) {}
}

// ============================================================================
// Errors
// ============================================================================

/// Why a probe failed
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Configured method is not a standard HTTP verb; no request was sent
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Deadline exceeded while waiting for headers or body
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Any other network, protocol or body-read failure
    #[error("{kind} error: {source}")]
    Transport {
        /// Coarse cause, kept for reporting
        kind: TransportKind,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },
}

impl ProbeError {
    /// Status code synthesized for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            ProbeError::Timeout(_) => crate::response::STATUS_TIMEOUT,
            ProbeError::InvalidMethod(_) | ProbeError::Transport { .. } => {
                crate::response::STATUS_FAILED
            }
        }
    }

    /// Classify a client error, separating timeouts from everything else
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout(timeout)
        } else {
            ProbeError::Transport {
                kind: TransportKind::of(&err),
                source: err,
            }
        }
    }

    /// Whether this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout(_))
    }
}

/// Coarse cause of a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connection could not be established (refused, DNS, TLS handshake)
    Connect,
    /// Request could not be sent
    Request,
    /// Response body could not be read
    Body,
    /// Redirect handling failed
    Redirect,
    /// Request could not be built (malformed URL, bad scheme)
    Builder,
    /// Anything else
    Other,
}

impl TransportKind {
    /// Derive the kind from a client error
    pub fn of(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            TransportKind::Builder
        } else if err.is_connect() {
            TransportKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportKind::Body
        } else if err.is_redirect() {
            TransportKind::Redirect
        } else if err.is_request() {
            TransportKind::Request
        } else {
            TransportKind::Other
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::Connect => "connect",
            TransportKind::Request => "request",
            TransportKind::Body => "body",
            TransportKind::Redirect => "redirect",
            TransportKind::Builder => "builder",
            TransportKind::Other => "transport",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ProbeError::Timeout(Duration::from_secs(1)).status_code(),
            408
        );
        assert_eq!(ProbeError::InvalidMethod("X".into()).status_code(), 400);
    }

    #[test]
    fn test_builder_errors_are_classified() {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let probe_error = ProbeError::from_reqwest(err, Duration::from_secs(1));

        assert!(matches!(
            probe_error,
            ProbeError::Transport {
                kind: TransportKind::Builder,
                ..
            }
        ));
        assert_eq!(probe_error.status_code(), 400);
        assert!(!probe_error.is_timeout());
    }

    #[test]
    fn test_transport_kind_display() {
        assert_eq!(TransportKind::Connect.to_string(), "connect");
        assert_eq!(TransportKind::Other.to_string(), "transport");
    }
}
