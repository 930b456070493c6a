//! pingauthz gateway library entry.
//!
//! This crate wires configuration, the shared token cache, the decision
//! client, the MCP dispatcher and the HTTP transport into one service. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod ops;
pub mod router;
pub mod services;
pub mod transport;
pub mod upstream;
