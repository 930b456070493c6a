//! Dispatcher module exports.
//!
//! Re-exports the protocol dispatcher and the tool trait so downstream
//! consumers can depend on this module directly.

pub mod dispatcher;

pub use dispatcher::{Dispatcher, Tool};
