//! Built-in MCP tools.

pub mod evaluate;

pub use evaluate::{EvaluateDecisionTool, TOOL_NAME};
