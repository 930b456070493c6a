//! `POST /mcp`: MCP JSON-RPC over HTTP.
//!
//! The body is taken as raw bytes so that unparseable JSON still produces a
//! JSON-RPC parse error instead of an extractor rejection.

use axum::{extract::State, Json};
use bytes::Bytes;

use pingauthz_core::protocol::jsonrpc::RpcResponse;

use crate::app_state::AppState;

pub async fn rpc(State(app): State<AppState>, body: Bytes) -> Json<RpcResponse> {
    Json(app.dispatcher().handle(&body).await)
}
