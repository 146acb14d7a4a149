//! HTTP requester built on reqwest
//!
//! One client is built per run and shared by every worker. Redirects are
//! never followed, so a 3xx is reported as-is. Each outcome, including
//! synthesized failures, is passed through the output filter and then to the
//! observer.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect, Client, Method};

use crate::config::RequesterConfig;
use crate::request::ProbeRequest;
use crate::response::{ProbeFailure, ProbeResponse, ProbeResult};
use crate::traits::{ProbeError, ProbeObserver, Requester};

/// Methods accepted by the requester, matched exactly
pub const ALLOWED_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "CONNECT", "OPTIONS", "TRACE",
];

/// Whether `method` is one of [`ALLOWED_METHODS`]
pub fn is_valid_method(method: &str) -> bool {
    ALLOWED_METHODS.contains(&method)
}

/// Errors building an [`HttpRequester`]
#[derive(Debug, thiserror::Error)]
pub enum RequesterError {
    /// Header name or value is not valid HTTP
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader {
        /// Offending header name
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Requester that performs real HTTP calls
pub struct HttpRequester {
    client: Client,
    config: RequesterConfig,
    method: Option<Method>,
    observer: Arc<dyn ProbeObserver>,
}

impl HttpRequester {
    /// Build the shared client for `config`
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed header or if the client cannot be
    /// built. An unknown method is not an error here; every request made
    /// with it fails with `InvalidMethod` instead.
    pub fn new(
        config: RequesterConfig,
        observer: Arc<dyn ProbeObserver>,
    ) -> Result<Self, RequesterError> {
        let headers = header_map(&config)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::none())
            .default_headers(headers)
            .build()?;

        let method = if is_valid_method(&config.method) {
            Method::from_bytes(config.method.as_bytes()).ok()
        } else {
            tracing::warn!(
                method = %config.method,
                "Unsupported HTTP method, every probe will fail"
            );
            None
        };

        Ok(Self {
            client,
            config,
            method,
            observer,
        })
    }

    /// Configuration this requester was built with
    pub fn config(&self) -> &RequesterConfig {
        &self.config
    }

    async fn send(
        &self,
        method: &Method,
        request: &ProbeRequest,
    ) -> Result<ProbeResponse, ProbeError> {
        let timeout = self.config.timeout;

        let response = self
            .client
            .request(method.clone(), request.target())
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(e, timeout))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProbeError::from_reqwest(e, timeout))?;

        Ok(ProbeResponse::new(status, body.len(), request.segment()))
    }
}

#[async_trait]
impl Requester for HttpRequester {
    fn method(&self) -> &str {
        &self.config.method
    }

    async fn invoke(&self, request: &ProbeRequest) -> ProbeResult {
        let outcome = match &self.method {
            Some(method) => self
                .send(method, request)
                .await
                .map_err(|e| ProbeFailure::new(e, request)),
            None => Err(ProbeFailure::new(
                ProbeError::InvalidMethod(self.config.method.clone()),
                request,
            )),
        };

        let response = match &outcome {
            Ok(response) => response,
            Err(failure) => &failure.response,
        };
        if self.config.filter.shows(response) {
            self.observer.on_outcome(self.method(), &outcome);
        }

        outcome
    }
}

impl std::fmt::Debug for HttpRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequester")
            .field("config", &self.config)
            .finish()
    }
}

fn header_map(config: &RequesterConfig) -> Result<HeaderMap, RequesterError> {
    let mut headers = HeaderMap::with_capacity(config.headers.len());

    for (name, value) in &config.headers {
        let invalid = |reason: String| RequesterError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests;
