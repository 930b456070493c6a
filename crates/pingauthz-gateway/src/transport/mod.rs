//! HTTP transport.
//!
//! - `mcp`: JSON-RPC endpoint, always HTTP 200.
//! - `legacy`: pre-protocol pass-through endpoint.

pub mod legacy;
pub mod mcp;
