//! pingauthz core: transport-agnostic protocol primitives and error types.
//!
//! This crate defines the JSON-RPC envelope, the MCP tool shapes, and the
//! authorization-decision model shared by the gateway and its tests. It
//! carries no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `ProxyError`/`Result` so malformed input from agents never
//! takes the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ClientCode, ProxyError, Result};
