//! Probe request value type

use serde::{Deserialize, Serialize};
use std::fmt;

/// One candidate to probe: a base URL and a path segment
///
/// Method, headers and timeout are not part of the request; they belong to
/// the [`Requester`](crate::Requester) shared by every worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeRequest {
    url: String,
    segment: String,
}

impl ProbeRequest {
    /// Create a request for `segment` under `url`
    pub fn new(url: impl Into<String>, segment: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            segment: segment.into(),
        }
    }

    /// Create a request for the base URL itself
    pub fn base(url: impl Into<String>) -> Self {
        Self::new(url, String::new())
    }

    /// Base URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path segment (empty for a base-URL probe)
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Whether this request probes the base URL only
    pub fn is_base(&self) -> bool {
        self.segment.is_empty()
    }

    /// Effective request target: `url/segment`, or `url` when the segment is empty
    pub fn target(&self) -> String {
        if self.segment.is_empty() {
            self.url.clone()
        } else {
            format!("{}/{}", self.url, self.segment)
        }
    }
}

impl fmt::Display for ProbeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_joins_segment() {
        let request = ProbeRequest::new("http://example.com", "banana");
        assert_eq!(request.target(), "http://example.com/banana");
        assert_eq!(request.to_string(), "http://example.com/banana");
    }

    #[test]
    fn test_target_without_segment_is_base_url() {
        let request = ProbeRequest::base("http://example.com");
        assert!(request.is_base());
        assert_eq!(request.target(), "http://example.com");
    }

    #[test]
    fn test_target_keeps_segment_verbatim() {
        let request = ProbeRequest::new("http://example.com/api", "v1/users?id=1");
        assert_eq!(request.target(), "http://example.com/api/v1/users?id=1");
        assert!(!request.is_base());
    }
}
