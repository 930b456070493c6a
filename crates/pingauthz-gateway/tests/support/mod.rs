//! Shared fixtures for gateway integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pingauthz_gateway::app_state::AppState;
use pingauthz_gateway::config::{self, ProxyConfig};
use pingauthz_gateway::router;
use pingauthz_gateway::upstream::Clock;

pub const TOKEN_PATH: &str = "/as/token";
pub const DECISION_PATH: &str = "/v1/environments/env-1/decisionEndpoints/dep-1";

/// Test clock advanced by hand.
pub struct ManualClock {
    base: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            base: Instant::now(),
            offset_ms: AtomicU64::new(0),
        })
    }

    pub fn advance(&self, d: Duration) {
        self.offset_ms
            .fetch_add(d.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

/// Fully populated config pointing both upstreams at `server`.
pub fn config_for(server: &MockServer) -> ProxyConfig {
    config::load_from_str(&format!(
        r#"
version: 1
identity:
  client_id: "cid"
  client_secret: "secret"
  token_url: "{uri}{TOKEN_PATH}"
decision:
  api_base: "{uri}/v1"
  env_id: "env-1"
  decision_endpoint_id: "dep-1"
"#,
        uri = server.uri()
    ))
    .expect("test config must parse")
}

pub async fn mount_token(server: &MockServer, token: &str, expires_in: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": expires_in
        })))
        .mount(server)
        .await;
}

pub async fn mount_decision(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(DECISION_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn requests_to(server: &MockServer, p: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == p)
        .count()
}

/// POST a raw body through the router, returning status + JSON body.
pub async fn post_raw(state: AppState, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    let resp = router::build_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn get_text(state: AppState, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router::build_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn rpc(state: AppState, envelope: Value) -> Value {
    let (status, body) = post_raw(state, "/mcp", envelope.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    body
}
