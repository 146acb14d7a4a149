//! Tests for the HTTP requester against a local server

use super::*;
use crate::config::OutputFilter;
use crate::traits::{NoopObserver, TransportKind};

use axum::http::{header, HeaderMap as AxumHeaders, Method as AxumMethod, StatusCode};
use axum::routing::{any, get};
use axum::Router;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

const SUCCESS_BODY: &str = "{\"message\": \"success\"}";

// ============================================================================
// Test server
// ============================================================================

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/", get(|| async { "root" }))
        .route("/ok", get(|| async { SUCCESS_BODY }))
        .route(
            "/error",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        )
        .route(
            "/redirect",
            get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/ok")]) }),
        )
        .route(
            "/echo-header",
            get(|headers: AxumHeaders| async move {
                headers
                    .get("x-probe")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string()
            }),
        )
        .route(
            "/method",
            any(|method: AxumMethod| async move { method.to_string() }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}

// ============================================================================
// Recording observer
// ============================================================================

#[derive(Default)]
struct RecordingObserver {
    seen: Mutex<Vec<(String, u16, usize)>>,
}

impl RecordingObserver {
    fn statuses(&self) -> Vec<u16> {
        self.seen.lock().unwrap().iter().map(|(_, s, _)| *s).collect()
    }
}

impl ProbeObserver for RecordingObserver {
    fn on_outcome(&self, method: &str, outcome: &ProbeResult) {
        let response = match outcome {
            Ok(response) => response,
            Err(failure) => &failure.response,
        };
        self.seen
            .lock()
            .unwrap()
            .push((method.to_string(), response.status, response.body_length));
    }
}

fn requester(config: RequesterConfig) -> (HttpRequester, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    let requester = HttpRequester::new(config.validated(), observer.clone()).unwrap();
    (requester, observer)
}

fn config_with_method(method: &str) -> RequesterConfig {
    RequesterConfig::new(Duration::from_secs(5), method, BTreeMap::new(), false)
}

// ============================================================================
// Method validation
// ============================================================================

#[test]
fn test_allowed_methods_are_exact() {
    for method in ALLOWED_METHODS {
        assert!(is_valid_method(method));
    }
    assert!(!is_valid_method("get"));
    assert!(!is_valid_method("INVALID"));
    assert!(!is_valid_method(""));
}

#[tokio::test]
async fn test_invalid_method_makes_no_request() {
    // Nothing listens on port 1; a real request would fail with a connect error.
    let (requester, observer) = requester(config_with_method("INVALID"));
    let request = ProbeRequest::new("http://127.0.0.1:1", "admin");

    let failure = requester.invoke(&request).await.unwrap_err();

    assert!(matches!(failure.error, ProbeError::InvalidMethod(ref m) if m == "INVALID"));
    assert_eq!(failure.response.status, 400);
    assert_eq!(failure.response.body_length, 0);
    assert_eq!(failure.response.segment, "admin");
    assert_eq!(observer.statuses(), vec![400]);
}

// ============================================================================
// Responses
// ============================================================================

#[tokio::test]
async fn test_success_reports_status_and_length() {
    let addr = spawn_server().await;
    let (requester, observer) = requester(config_with_method("GET"));

    let response = requester
        .invoke(&ProbeRequest::new(base_url(addr), "ok"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body_length, 22);
    assert_eq!(response.segment, "ok");
    assert_eq!(
        *observer.seen.lock().unwrap(),
        vec![("GET".to_string(), 200, 22)]
    );
}

#[tokio::test]
async fn test_server_error_is_a_response() {
    let addr = spawn_server().await;
    let (requester, _observer) = requester(config_with_method("GET"));

    let response = requester
        .invoke(&ProbeRequest::new(base_url(addr), "error"))
        .await
        .unwrap();

    assert_eq!(response.status, 500);
    assert_eq!(response.body_length, 0);
}

#[tokio::test]
async fn test_base_probe_hits_bare_url() {
    let addr = spawn_server().await;
    let (requester, _observer) = requester(config_with_method("GET"));

    let response = requester
        .invoke(&ProbeRequest::base(base_url(addr)))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body_length, "root".len());
}

#[tokio::test]
async fn test_missing_path_is_404() {
    let addr = spawn_server().await;
    let (requester, _observer) = requester(config_with_method("GET"));

    let response = requester
        .invoke(&ProbeRequest::new(base_url(addr), "nope"))
        .await
        .unwrap();

    assert_eq!(response.status, 404);
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let addr = spawn_server().await;
    let (requester, _observer) = requester(config_with_method("GET"));

    let response = requester
        .invoke(&ProbeRequest::new(base_url(addr), "redirect"))
        .await
        .unwrap();

    assert_eq!(response.status, 302);
    assert_eq!(response.body_length, 0);
}

#[tokio::test]
async fn test_configured_method_is_used() {
    let addr = spawn_server().await;
    let (requester, observer) = requester(config_with_method("POST"));

    let response = requester
        .invoke(&ProbeRequest::new(base_url(addr), "method"))
        .await
        .unwrap();

    assert_eq!(response.body_length, "POST".len());
    assert_eq!(observer.seen.lock().unwrap()[0].0, "POST");
}

#[tokio::test]
async fn test_headers_are_applied() {
    let addr = spawn_server().await;
    let mut headers = BTreeMap::new();
    headers.insert("X-Probe".to_string(), "dizzy-test".to_string());
    let config = RequesterConfig::new(Duration::from_secs(5), "GET", headers, false);
    let (requester, _observer) = requester(config);

    let response = requester
        .invoke(&ProbeRequest::new(base_url(addr), "echo-header"))
        .await
        .unwrap();

    assert_eq!(response.body_length, "dizzy-test".len());
}

#[test]
fn test_invalid_header_is_rejected() {
    let mut headers = BTreeMap::new();
    headers.insert("bad header".to_string(), "x".to_string());
    let config = RequesterConfig::new(Duration::from_secs(5), "GET", headers, false);

    let err = HttpRequester::new(config, Arc::new(NoopObserver)).unwrap_err();
    assert!(matches!(err, RequesterError::InvalidHeader { ref name, .. } if name == "bad header"));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_timeout_synthesizes_408() {
    let addr = spawn_server().await;
    let config = RequesterConfig::new(Duration::from_millis(100), "GET", BTreeMap::new(), false);
    let (requester, observer) = requester(config);

    let failure = requester
        .invoke(&ProbeRequest::new(base_url(addr), "slow"))
        .await
        .unwrap_err();

    assert!(failure.error.is_timeout());
    assert_eq!(failure.response.status, 408);
    assert_eq!(failure.response.body_length, 0);
    assert_eq!(observer.statuses(), vec![408]);
}

#[tokio::test]
async fn test_connection_refused_is_connect_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (requester, _observer) = requester(config_with_method("GET"));
    let failure = requester
        .invoke(&ProbeRequest::new(base_url(addr), "x"))
        .await
        .unwrap_err();

    assert!(matches!(
        failure.error,
        ProbeError::Transport {
            kind: TransportKind::Connect,
            ..
        }
    ));
    assert_eq!(failure.response.status, 400);
    assert_eq!(failure.response.body_length, 0);
}

// ============================================================================
// Output filter
// ============================================================================

#[tokio::test]
async fn test_failures_only_hides_success() {
    let addr = spawn_server().await;
    let config = RequesterConfig::new(Duration::from_secs(5), "GET", BTreeMap::new(), true);
    let (requester, observer) = requester(config);

    requester
        .invoke(&ProbeRequest::new(base_url(addr), "ok"))
        .await
        .unwrap();
    requester
        .invoke(&ProbeRequest::new(base_url(addr), "error"))
        .await
        .unwrap();

    assert_eq!(observer.statuses(), vec![500]);
}

#[tokio::test]
async fn test_excluded_length_hides_matching_body() {
    let addr = spawn_server().await;
    let config = config_with_method("GET").with_excluded_length(Some(22));
    assert_eq!(
        config.filter,
        OutputFilter {
            failures_only: false,
            exclude_length: Some(22)
        }
    );
    let (requester, observer) = requester(config);

    requester
        .invoke(&ProbeRequest::new(base_url(addr), "ok"))
        .await
        .unwrap();
    requester
        .invoke(&ProbeRequest::base(base_url(addr)))
        .await
        .unwrap();

    assert_eq!(
        *observer.seen.lock().unwrap(),
        vec![("GET".to_string(), 200, 4)]
    );
}

#[tokio::test]
async fn test_validated_defaults_reach_the_client() {
    let config = RequesterConfig::new(Duration::ZERO, "", BTreeMap::new(), false);
    let requester = HttpRequester::new(config.validated(), Arc::new(NoopObserver)).unwrap();

    assert_eq!(requester.method(), "GET");
    assert_eq!(requester.config().timeout, Duration::from_secs(10));
}
