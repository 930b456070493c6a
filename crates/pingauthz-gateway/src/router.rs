//! Axum router wiring.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(ops::MCP_PATH, post(transport::mcp::rpc))
        .route(ops::LEGACY_PATH, post(transport::legacy::authorize_decision))
        .route("/help", get(ops::help))
        .route("/schema", get(ops::help))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
