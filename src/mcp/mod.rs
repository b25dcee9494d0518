//! MCP (Model Context Protocol) server module
//!
//! This module implements a JSON-RPC 2.0 compliant MCP server that
//! exposes the place recommender as an MCP tool over stdio. Results are
//! streamed to the client as `notifications/progress` messages.

pub mod error;
pub mod handlers;
pub mod progress;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

// Re-export main types
pub use error::McpError;
pub use progress::McpProgressSink;
pub use server::McpServer;
pub use tools::{McpToolHandler, ToolRegistry};
pub use transport::StdioTransport;
