//! Authorization-decision model.
//!
//! `DecisionRequest` is built once at the tool boundary (all presence checks
//! happen there) and `DecisionResult` once per backend reply.

use std::fmt;

use serde_json::{json, Map, Value};

use crate::error::{ProxyError, Result};

/// Parameter key carrying the policy request kind.
pub const POLICY_REQUEST_KEY: &str = "Policy Request";

/// Policy request kind used when the caller does not name one.
pub const DEFAULT_POLICY_REQUEST: &str = "payment";

/// Normalized decision returned by the policy endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Permit,
    Deny,
    NotApplicable,
    Unknown,
}

impl Decision {
    /// Classify a wire value. Anything unrecognized is `Unknown`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "PERMIT" => Decision::Permit,
            "DENY" => Decision::Deny,
            "NOT_APPLICABLE" => Decision::NotApplicable,
            _ => Decision::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Permit => "PERMIT",
            Decision::Deny => "DENY",
            Decision::NotApplicable => "NOT_APPLICABLE",
            Decision::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to evaluate one authorization decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRequest {
    user_id: String,
    policy_request_kind: String,
    parameters: Map<String, Value>,
}

impl DecisionRequest {
    /// Build a request, setting `"Policy Request"` to `policy_request_kind`
    /// unless the caller already supplied that key.
    pub fn new(
        user_id: impl Into<String>,
        policy_request_kind: impl Into<String>,
        mut parameters: Map<String, Value>,
    ) -> Self {
        let policy_request_kind = policy_request_kind.into();
        if !parameters.contains_key(POLICY_REQUEST_KEY) {
            parameters.insert(
                POLICY_REQUEST_KEY.to_string(),
                Value::String(policy_request_kind.clone()),
            );
        }
        Self {
            user_id: user_id.into(),
            policy_request_kind,
            parameters,
        }
    }

    /// Validate loosely-typed tool arguments.
    ///
    /// - `user_id`: required, non-empty string
    /// - `policy_request`: optional string, defaults to `payment`
    /// - `parameters`: optional object
    pub fn from_arguments(args: &Map<String, Value>) -> Result<Self> {
        let user_id = match args.get("user_id") {
            None | Some(Value::Null) => {
                return Err(ProxyError::Validation("user_id is required".into()))
            }
            Some(Value::String(s)) if s.is_empty() => {
                return Err(ProxyError::Validation("user_id is required".into()))
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(ProxyError::Validation("user_id must be a string".into())),
        };

        let kind = match args.get("policy_request") {
            None | Some(Value::Null) => DEFAULT_POLICY_REQUEST.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(ProxyError::Validation(
                    "policy_request must be a string".into(),
                ))
            }
        };

        let parameters = match args.get("parameters") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(m)) => m.clone(),
            Some(_) => {
                return Err(ProxyError::Validation(
                    "parameters must be an object".into(),
                ))
            }
        };

        Ok(Self::new(user_id, kind, parameters))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn policy_request_kind(&self) -> &str {
        &self.policy_request_kind
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    /// Body sent to the decision endpoint.
    pub fn to_backend_body(&self) -> Value {
        json!({
            "parameters": self.parameters,
            "userContext": {
                "user": { "id": self.user_id }
            }
        })
    }
}

/// Classified reply of one decision call.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionResult {
    decision: Decision,
    raw_payload: Value,
}

impl DecisionResult {
    pub fn from_payload(raw_payload: Value) -> Self {
        let decision = raw_payload
            .get("decision")
            .and_then(Value::as_str)
            .map(Decision::from_wire)
            .unwrap_or(Decision::Unknown);
        Self {
            decision,
            raw_payload,
        }
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }

    pub fn raw_payload(&self) -> &Value {
        &self.raw_payload
    }

    /// Decision as the backend spelled it (`UNKNOWN` when absent).
    pub fn raw_label(&self) -> String {
        match self.raw_payload.get("decision") {
            None | Some(Value::Null) => Decision::Unknown.as_str().to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Human-readable tool output: decision line, summary, full payload.
    pub fn render_summary(&self) -> String {
        let label = self.raw_label();
        let summary = match self.decision {
            Decision::Permit => "✓ The request is authorized.".to_string(),
            Decision::Deny => "✗ The request is denied.".to_string(),
            Decision::NotApplicable => "⚠ No policy matched this request.".to_string(),
            Decision::Unknown => format!("⚠ Decision status: {label}"),
        };
        format!(
            "Authorization Decision: {label}\n{summary}\n\nFull response: {}",
            self.raw_payload
        )
    }
}
