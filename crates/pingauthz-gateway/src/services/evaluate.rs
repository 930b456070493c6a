use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use pingauthz_core::error::{ProxyError, Result};
use pingauthz_core::protocol::decision::{DecisionRequest, DEFAULT_POLICY_REQUEST};
use pingauthz_core::protocol::mcp::{ToolDescriptor, ToolResult};

use crate::dispatch::Tool;
use crate::upstream::DecisionClient;

pub const TOOL_NAME: &str = "evaluate_authorization_decision";

pub const TOOL_SUMMARY: &str = "Evaluate authorization decisions using PingOne Authorize";

const TOOL_DESCRIPTION: &str = "Evaluate an authorization decision using PingOne Authorize \
Policy Decision service. Use this to check if a user is permitted to perform an action \
(e.g., payment, resource access) based on your PingOne policies.";

/// `evaluate_authorization_decision`: one decision call per invocation.
pub struct EvaluateDecisionTool {
    client: Arc<DecisionClient>,
}

impl EvaluateDecisionTool {
    pub fn new(client: Arc<DecisionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for EvaluateDecisionTool {
    fn name(&self) -> &'static str {
        TOOL_NAME
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: TOOL_NAME.to_string(),
            description: TOOL_DESCRIPTION.to_string(),
            input_schema: input_schema(),
        }
    }

    async fn call(&self, arguments: Map<String, Value>) -> Result<ToolResult> {
        // Invalid input is rejected before any network traffic.
        let request = DecisionRequest::from_arguments(&arguments)?;

        match self.client.evaluate(&request).await {
            Ok(result) => Ok(ToolResult::text(result.render_summary())),
            Err(e) => {
                tracing::warn!(user_id = %request.user_id(), error = %e, "decision evaluation failed");
                Ok(ToolResult::error(render_failure(&e)))
            }
        }
    }
}

/// Tool-level failure text.
pub fn render_failure(e: &ProxyError) -> String {
    match e {
        ProxyError::Upstream { status, body } => format!("PingOne API error: {status}\n{body}"),
        ProxyError::Credential(msg) => format!("Failed to obtain access token: {msg}"),
        other => format!("Error calling PingOne: {other}"),
    }
}

fn input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "user_id": {
                "type": "string",
                "description": "PingOne user ID for whom the authorization decision is requested"
            },
            "policy_request": {
                "type": "string",
                "description": "Type of policy request (e.g., 'payment', 'access', 'transfer')",
                "default": DEFAULT_POLICY_REQUEST
            },
            "parameters": {
                "type": "object",
                "description": "Policy-specific parameters. Structure depends on your PingOne policy configuration. Common patterns include 'Request - Payment.paymentAmount', 'Request - Payment.creditorName', 'Request - Payment.consentId', etc.",
                "additionalProperties": true
            }
        },
        "required": ["user_id"]
    })
}
