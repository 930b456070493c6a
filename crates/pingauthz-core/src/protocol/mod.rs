//! Protocol modules.
//!
//! - `jsonrpc`: JSON-RPC 2.0 request/response envelopes.
//! - `mcp`: MCP tool descriptors, tool results and server metadata.
//! - `decision`: the authorization-decision request/result model.
//!
//! Decoders are panic-free: malformed input is reported as `ProxyError`.

pub mod decision;
pub mod jsonrpc;
pub mod mcp;
