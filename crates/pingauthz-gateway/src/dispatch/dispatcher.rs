use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{json, Map, Value};

use pingauthz_core::error::{ProxyError, Result};
use pingauthz_core::protocol::jsonrpc::{decode_request, RpcRequest, RpcResponse};
use pingauthz_core::protocol::mcp::{initialize_result, ServerInfo, ToolDescriptor, ToolResult};

use crate::obs::ProxyMetrics;

/// MCP tool. Invocation failures that belong to the tool's backend are
/// returned as `Ok(ToolResult { is_error: true, .. })`; `Err` is reserved for
/// invalid input and becomes a protocol error.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn descriptor(&self) -> ToolDescriptor;
    async fn call(&self, arguments: Map<String, Value>) -> Result<ToolResult>;
}

/// Routes JSON-RPC envelopes to `initialize`, `tools/list` and `tools/call`.
pub struct Dispatcher {
    server: ServerInfo,
    tools: DashMap<&'static str, Arc<dyn Tool>>,
    metrics: Arc<ProxyMetrics>,
}

impl Dispatcher {
    pub fn new(server: ServerInfo, metrics: Arc<ProxyMetrics>) -> Self {
        Self {
            server,
            tools: DashMap::new(),
            metrics,
        }
    }

    pub fn register_tool(&self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    pub fn registered_tools(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.tools.iter().map(|e| *e.key()).collect();
        names.sort_unstable();
        names
    }

    /// Handle one raw request body. Never fails: every error is folded into
    /// the response envelope.
    pub async fn handle(&self, body: &[u8]) -> RpcResponse {
        let req = match decode_request(body) {
            Ok(req) => req,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable envelope");
                self.metrics
                    .rpc_requests
                    .inc(&[("method", "<parse>"), ("outcome", "rpc_error")]);
                return RpcResponse::failure(Value::Null, &e);
            }
        };
        self.handle_request(req).await
    }

    pub async fn handle_request(&self, req: RpcRequest) -> RpcResponse {
        let id = req.response_id();
        let method = req.method.clone();

        let (resp, outcome) = match self.route(req).await {
            Ok(result) => {
                let outcome = if result.get("isError") == Some(&Value::Bool(true)) {
                    "tool_error"
                } else {
                    "ok"
                };
                (RpcResponse::success(id, result), outcome)
            }
            Err(e) => {
                tracing::debug!(%method, error = %e, "rpc request failed");
                (RpcResponse::failure(id, &e), "rpc_error")
            }
        };

        let method_label = match method.as_str() {
            "initialize" | "tools/list" | "tools/call" => method.as_str(),
            _ => "<unknown>",
        };
        self.metrics
            .rpc_requests
            .inc(&[("method", method_label), ("outcome", outcome)]);
        resp
    }

    async fn route(&self, req: RpcRequest) -> Result<Value> {
        match req.method.as_str() {
            "initialize" => Ok(initialize_result(&self.server)),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => {
                let result = self.call_tool(req.params.unwrap_or_default()).await?;
                serde_json::to_value(result)
                    .map_err(|e| ProxyError::Internal(format!("encode tool result failed: {e}")))
            }
            other => Err(ProxyError::UnknownMethod(other.to_string())),
        }
    }

    fn list_tools(&self) -> Value {
        let mut descriptors: Vec<ToolDescriptor> =
            self.tools.iter().map(|e| e.value().descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        json!({ "tools": descriptors })
    }

    async fn call_tool(&self, mut params: Map<String, Value>) -> Result<ToolResult> {
        let name = match params.get("name") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(ProxyError::UnknownTool(other.to_string())),
            None => return Err(ProxyError::UnknownTool("<none>".into())),
        };

        let tool = self
            .tools
            .get(name.as_str())
            .ok_or_else(|| ProxyError::UnknownTool(name.clone()))?
            .value()
            .clone();

        let arguments = match params.remove("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(m)) => m,
            Some(_) => {
                return Err(ProxyError::Validation("arguments must be an object".into()))
            }
        };

        tool.call(arguments).await
    }
}
