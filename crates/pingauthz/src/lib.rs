//! Top-level facade crate for pingauthz.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use pingauthz_core::*;
}

pub mod gateway {
    pub use pingauthz_gateway::*;
}
