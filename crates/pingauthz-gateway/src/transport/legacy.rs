//! `POST /api/authorize-decision`: legacy pass-through.
//!
//! Forwards the caller's JSON body verbatim to the decision endpoint and
//! mirrors the backend status and payload. Errors are plain `{"error": ...}`
//! bodies: 400 invalid JSON, 500 config/token failure, 502 transport failure.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::app_state::AppState;

pub async fn authorize_decision(State(app): State<AppState>, body: Bytes) -> Response {
    let (status, payload) = forward(&app, &body).await;
    app.metrics()
        .legacy_requests
        .inc(&[("status", status.as_str())]);
    (status, Json(payload)).into_response()
}

async fn forward(app: &AppState, raw: &[u8]) -> (StatusCode, Value) {
    let body: Value = match serde_json::from_slice(raw) {
        Ok(v) => v,
        Err(_) => return (StatusCode::BAD_REQUEST, json!({ "error": "Invalid JSON body" })),
    };

    let client = app.decision_client();

    let target = match client.resolve_target() {
        Ok(t) => t,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() })),
    };

    let token = match client.tokens().get_token().await {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "legacy request: token acquisition failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }));
        }
    };

    match client.send(&target, &token, &body).await {
        Ok(reply) => {
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, reply.payload)
        }
        Err(e) => {
            tracing::warn!(error = %e, "legacy request: decision call failed");
            (StatusCode::BAD_GATEWAY, json!({ "error": e.to_string() }))
        }
    }
}
