//! JSON-RPC 2.0 envelopes (MCP over HTTP).
//!
//! Requests are decoded leniently (unknown fields and a missing `jsonrpc`
//! member are tolerated) but `method` is required and `params`, when present,
//! must be an object. Responses always carry exactly one of `result` / `error`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ProxyError, Result};

/// Protocol version echoed in every response.
pub const JSONRPC_VERSION: &str = "2.0";

/// Inbound request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    /// Protocol version. Not enforced.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Correlation token, echoed back verbatim.
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name (e.g. `tools/call`).
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

impl RpcRequest {
    /// Correlation id to echo, `null` when the caller sent none.
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }
}

/// Decode an inbound envelope.
///
/// Both unparseable JSON and JSON that does not form an envelope are
/// reported as [`ProxyError::Parse`].
pub fn decode_request(body: &[u8]) -> Result<RpcRequest> {
    serde_json::from_slice(body).map_err(|e| ProxyError::Parse(e.to_string()))
}

/// Error object of a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<&ProxyError> for RpcError {
    fn from(e: &ProxyError) -> Self {
        let code = e.client_code();
        Self {
            code: code.rpc_code(),
            message: code.rpc_message().to_string(),
            data: Some(Value::String(e.to_string())),
        }
    }
}

/// Either a result or an error; flattened into the response object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcOutcome {
    Result(Value),
    Error(RpcError),
}

/// Outbound response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: RpcOutcome,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: RpcOutcome::Result(result),
        }
    }

    pub fn failure(id: Value, err: &ProxyError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            outcome: RpcOutcome::Error(RpcError::from(err)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, RpcOutcome::Error(_))
    }
}
