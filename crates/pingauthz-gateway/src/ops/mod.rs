//! Operational and discovery HTTP endpoints.
//!
//! - `/healthz`          : liveness
//! - `/metrics`          : Prometheus text format
//! - `/help`, `/schema`  : static description of the endpoints and the tool

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::services::evaluate::{TOOL_NAME, TOOL_SUMMARY};

pub const MCP_PATH: &str = "/mcp";
pub const LEGACY_PATH: &str = "/api/authorize-decision";

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn help() -> Json<Value> {
    Json(discovery_document())
}

pub fn discovery_document() -> Value {
    json!({
        "mcp_endpoint": MCP_PATH,
        "legacy_endpoint": LEGACY_PATH,
        "description": "PingOne Authorize Policy Decision MCP Server",
        "protocol": "MCP (Model Context Protocol) JSON-RPC over HTTP",
        "tool": {
            "name": TOOL_NAME,
            "description": TOOL_SUMMARY
        }
    })
}
