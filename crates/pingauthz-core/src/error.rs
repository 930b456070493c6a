//! Shared error type across pingauthz crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Required identifiers missing from configuration.
    Config,
    /// Access token could not be obtained.
    Credential,
    /// Identity provider or decision endpoint failed.
    Upstream,
    /// Malformed caller input.
    Validation,
    /// Tool name not registered.
    UnknownTool,
    /// JSON-RPC method not supported.
    UnknownMethod,
    /// Inbound envelope could not be parsed.
    Parse,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Config => "CONFIG_ERROR",
            ClientCode::Credential => "CREDENTIAL_ERROR",
            ClientCode::Upstream => "UPSTREAM_ERROR",
            ClientCode::Validation => "VALIDATION_ERROR",
            ClientCode::UnknownTool => "UNKNOWN_TOOL",
            ClientCode::UnknownMethod => "UNKNOWN_METHOD",
            ClientCode::Parse => "PARSE_ERROR",
            ClientCode::Internal => "INTERNAL",
        }
    }

    /// JSON-RPC 2.0 error code for protocol-level failures.
    pub fn rpc_code(self) -> i64 {
        match self {
            ClientCode::Parse => -32700,
            ClientCode::UnknownMethod => -32601,
            ClientCode::Validation | ClientCode::UnknownTool => -32602,
            _ => -32000,
        }
    }

    /// JSON-RPC error message paired with [`ClientCode::rpc_code`].
    pub fn rpc_message(self) -> &'static str {
        match self {
            ClientCode::Parse => "Parse error",
            ClientCode::UnknownMethod => "Method not found",
            ClientCode::Validation | ClientCode::UnknownTool => "Invalid params",
            _ => "Server error",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Unified error type used by core and gateway.
///
/// `Clone` because a single token refresh result is handed to every caller
/// that waited on it.
#[derive(Debug, Clone, Error)]
pub enum ProxyError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Credential(String),
    #[error("HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("{0}")]
    UpstreamTransport(String),
    #[error("{0}")]
    Validation(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    #[error("{0}")]
    Parse(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ProxyError::Config(_) => ClientCode::Config,
            ProxyError::Credential(_) => ClientCode::Credential,
            ProxyError::Upstream { .. } | ProxyError::UpstreamTransport(_) => ClientCode::Upstream,
            ProxyError::Validation(_) => ClientCode::Validation,
            ProxyError::UnknownTool(_) => ClientCode::UnknownTool,
            ProxyError::UnknownMethod(_) => ClientCode::UnknownMethod,
            ProxyError::Parse(_) => ClientCode::Parse,
            ProxyError::Internal(_) => ClientCode::Internal,
        }
    }

    /// HTTP status reported by the upstream service, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ProxyError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
