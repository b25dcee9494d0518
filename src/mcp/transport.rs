//! Stdio transport for MCP protocol
//!
//! Responses and notifications come from concurrently running tool
//! calls, so every write goes through one async mutex and each message
//! is written and flushed as a single line.

use crate::mcp::error::McpError;
use crate::mcp::protocol::{JsonRpcNotification, JsonRpcResponse};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;
use tracing::debug;

type Writer = BufWriter<Box<dyn AsyncWrite + Send + Unpin>>;

pub struct StdioTransport {
    writer: Mutex<Writer>,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self::with_writer(tokio::io::stdout())
    }

    /// Transport writing to an arbitrary sink (tests use an in-memory pipe)
    pub fn with_writer<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let boxed: Box<dyn AsyncWrite + Send + Unpin> = Box::new(writer);
        Self {
            writer: Mutex::new(BufWriter::new(boxed)),
        }
    }

    /// Send JSON-RPC response to stdout
    pub async fn send_response(&self, response: JsonRpcResponse) -> Result<(), McpError> {
        // Skip responses for notifications (no id)
        if response.is_empty() {
            return Ok(());
        }

        self.write_line(&response).await
    }

    /// Send a server-to-client notification
    pub async fn send_notification(
        &self,
        notification: JsonRpcNotification,
    ) -> Result<(), McpError> {
        self.write_line(&notification).await
    }

    async fn write_line<T: Serialize>(&self, message: &T) -> Result<(), McpError> {
        let json = serde_json::to_string(message)?;
        debug!("Sending: {}", json);

        // Write JSON + newline
        let mut writer = self.writer.lock().await;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        Ok(())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}
