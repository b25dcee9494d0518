//! MCP-specific error types
//!
//! Tool failures are reported as `isError` results, not as errors here.

use crate::mcp::protocol::{INTERNAL_ERROR, INVALID_PARAMS};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// The request was cancelled; no response is sent
    #[error("Request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// JSON-RPC error code and message for this error
    pub fn code_and_message(&self) -> (i32, String) {
        match self {
            McpError::InvalidParams(msg) => (INVALID_PARAMS, format!("Invalid params: {msg}")),
            McpError::Cancelled => (INTERNAL_ERROR, "Request cancelled".to_string()),
            McpError::Io(e) => (INTERNAL_ERROR, format!("I/O error: {e}")),
            McpError::Json(e) => (INTERNAL_ERROR, format!("JSON error: {e}")),
        }
    }
}
