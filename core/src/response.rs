//! Probe response types

use crate::request::ProbeRequest;
use crate::traits::ProbeError;
use serde::{Deserialize, Serialize};

/// Status synthesized for timed-out requests
pub const STATUS_TIMEOUT: u16 = 408;

/// Status synthesized for every other failed request
pub const STATUS_FAILED: u16 = 400;

/// Outcome of one probe: status code and body size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResponse {
    /// HTTP status code (real or synthesized)
    pub status: u16,

    /// Number of body bytes read
    pub body_length: usize,

    /// Path segment the request was built from
    pub segment: String,
}

impl ProbeResponse {
    /// Create a response
    pub fn new(status: u16, body_length: usize, segment: impl Into<String>) -> Self {
        Self {
            status,
            body_length,
            segment: segment.into(),
        }
    }

    /// Response with an empty body, used when the request failed
    pub fn synthesized(status: u16, segment: impl Into<String>) -> Self {
        Self::new(status, 0, segment)
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A failed probe: the error together with the response synthesized for it
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ProbeFailure {
    /// Synthesized response (408 on timeout, 400 otherwise, empty body)
    pub response: ProbeResponse,

    /// Why the probe failed
    #[source]
    pub error: ProbeError,
}

impl ProbeFailure {
    /// Build a failure for `request`, synthesizing the matching response
    pub fn new(error: ProbeError, request: &ProbeRequest) -> Self {
        Self {
            response: ProbeResponse::synthesized(error.status_code(), request.segment()),
            error,
        }
    }
}

/// Result of invoking a requester
pub type ProbeResult = Result<ProbeResponse, ProbeFailure>;
