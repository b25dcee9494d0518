//! Tool handler trait and common types

use crate::core::orchestrator::ProgressSink;
use crate::core::types::ProgressToken;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ContentBlock, ToolResult, ToolSchema};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Per-call context handed to a tool
///
/// Carries the caller's progress token (null if none was supplied),
/// the sink for progress messages and the call's cancellation token.
#[derive(Clone)]
pub struct ToolContext {
    pub progress_token: ProgressToken,
    pub sink: Arc<dyn ProgressSink>,
    pub cancel: CancellationToken,
}

/// Trait for MCP tool implementations
///
/// Each tool implements this trait to provide schema and execution logic.
#[async_trait]
pub trait McpToolHandler: Send + Sync {
    /// Tool name (e.g., "kakao_map_place_recommender")
    fn name(&self) -> &str;

    /// Tool schema for tools/list
    fn schema(&self) -> ToolSchema;

    /// Execute tool with arguments
    async fn execute(&self, args: Value, ctx: ToolContext) -> Result<ToolResult, McpError>;
}

/// Helper function to create a text content block
pub fn text_content(text: String) -> ToolResult {
    ToolResult {
        content: vec![ContentBlock::Text { text }],
        is_error: false,
    }
}

/// Tool-level failure, reported in the result rather than as a JSON-RPC error
pub fn error_content(text: String) -> ToolResult {
    ToolResult {
        content: vec![ContentBlock::Text { text }],
        is_error: true,
    }
}
