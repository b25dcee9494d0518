//! Progress notifications as a `ProgressSink`

use crate::core::error::{PlaceError, Result};
use crate::core::orchestrator::ProgressSink;
use crate::core::types::ProgressToken;
use crate::mcp::protocol::{JsonRpcNotification, ProgressParams};
use crate::mcp::transport::StdioTransport;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const PROGRESS_METHOD: &str = "notifications/progress";

/// Sends `notifications/progress` for one tool call
///
/// `progress` starts at 1 and increases with every message. Messages for
/// a null token (caller asked for no progress) are dropped.
pub struct McpProgressSink {
    transport: Arc<StdioTransport>,
    sent: AtomicU64,
}

impl McpProgressSink {
    pub fn new(transport: Arc<StdioTransport>) -> Self {
        Self {
            transport,
            sent: AtomicU64::new(0),
        }
    }

    /// Number of notifications written so far
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressSink for McpProgressSink {
    async fn emit(&self, token: &ProgressToken, message: String) -> Result<()> {
        if token.is_none() {
            tracing::debug!("No progress token; dropping {} byte message", message.len());
            return Ok(());
        }

        let progress = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        let params = ProgressParams {
            progress_token: token.clone(),
            progress,
            message: Some(message),
        };

        let notification = JsonRpcNotification::new(PROGRESS_METHOD, serde_json::to_value(params)?);

        self.transport
            .send_notification(notification)
            .await
            .map_err(|e| PlaceError::Delivery(e.to_string()))
    }
}
