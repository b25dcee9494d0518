//! MCP server implementation
//!
//! Requests are read line by line from stdin. Everything except
//! `tools/call` is answered inline; each tool call runs in its own task
//! with a cancellation token so that `notifications/cancelled` and
//! Ctrl+C can interrupt it while the loop keeps reading.

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::handlers::ProtocolHandlers;
use crate::mcp::protocol::*;
use crate::mcp::transport::StdioTransport;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

type InFlight = Arc<Mutex<HashMap<String, CancellationToken>>>;

pub struct McpServer {
    transport: Arc<StdioTransport>,
    handlers: Arc<ProtocolHandlers>,
    in_flight: InFlight,
    shutdown: CancellationToken,
}

impl McpServer {
    pub fn new(services: Arc<Services>) -> Self {
        Self::with_transport(services, Arc::new(StdioTransport::new()))
    }

    pub fn with_transport(services: Arc<Services>, transport: Arc<StdioTransport>) -> Self {
        Self {
            handlers: Arc::new(ProtocolHandlers::new(services, Arc::clone(&transport))),
            transport,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token cancelling every running tool call
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the MCP server on stdin (blocking)
    pub async fn run(&self) -> Result<(), McpError> {
        self.serve(BufReader::new(tokio::io::stdin())).await
    }

    /// Serve requests read from `reader` until EOF or Ctrl+C
    ///
    /// On EOF, running tool calls are allowed to finish. On Ctrl+C they
    /// are cancelled.
    pub async fn serve<R>(&self, reader: R) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
    {
        info!("Starting kakao-place MCP server");

        let mut lines = reader.lines();
        let mut calls: JoinSet<()> = JoinSet::new();

        // Spawn signal handler; if no handler can be installed, never fire
        let mut ctrl_c = tokio::spawn(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        });

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) if !line.trim().is_empty() => {
                            self.process_line(&line, &mut calls).await?;
                        }
                        None => break, // EOF
                        _ => continue,
                    }
                }

                Some(joined) = calls.join_next(), if !calls.is_empty() => {
                    if let Err(e) = joined {
                        error!("Tool call task failed: {}", e);
                    }
                }

                _ = &mut ctrl_c => {
                    info!("Received shutdown signal");
                    self.shutdown.cancel();
                    break;
                }
            }
        }

        if !calls.is_empty() {
            info!("Waiting for {} running tool call(s)", calls.len());
        }
        while let Some(joined) = calls.join_next().await {
            if let Err(e) = joined {
                error!("Tool call task failed: {}", e);
            }
        }
        ctrl_c.abort();

        info!("MCP server shutting down");
        Ok(())
    }

    async fn process_line(&self, line: &str, calls: &mut JoinSet<()>) -> Result<(), McpError> {
        debug!("Received: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                error!("Error parsing message: {}", e);
                let response = JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                return self.transport.send_response(response).await;
            }
        };

        match request.method.as_str() {
            "tools/call" => {
                self.spawn_tool_call(request, calls);
                Ok(())
            }
            "notifications/cancelled" => {
                self.cancel_request(request.params);
                Ok(())
            }
            _ => {
                let id = request.id.clone();
                let response = match self.handlers.dispatch(request).await {
                    Ok(response) => response,
                    Err(e) => {
                        error!("Error processing message: {}", e);
                        let (code, message) = e.code_and_message();
                        JsonRpcResponse::error(id, code, message)
                    }
                };
                self.transport.send_response(response).await
            }
        }
    }

    fn spawn_tool_call(&self, request: JsonRpcRequest, calls: &mut JoinSet<()>) {
        let key = request.id.as_ref().map(request_key);
        let cancel = self.shutdown.child_token();

        if let Some(key) = &key {
            lock(&self.in_flight).insert(key.clone(), cancel.clone());
        }

        let handlers = Arc::clone(&self.handlers);
        let transport = Arc::clone(&self.transport);
        let in_flight = Arc::clone(&self.in_flight);
        let id = request.id.clone();

        calls.spawn(async move {
            let outcome = handlers.handle_tools_call(request, cancel).await;

            if let Some(key) = &key {
                lock(&in_flight).remove(key);
            }

            let response = match outcome {
                Ok(response) => response,
                Err(McpError::Cancelled) => {
                    info!("Tool call {:?} cancelled; no response sent", id);
                    return;
                }
                Err(e) => {
                    error!("Error processing tool call: {}", e);
                    let (code, message) = e.code_and_message();
                    JsonRpcResponse::error(id, code, message)
                }
            };

            if let Err(e) = transport.send_response(response).await {
                error!("Failed to send tool call response: {}", e);
            }
        });
    }

    fn cancel_request(&self, params: Option<Value>) {
        let Some(params) = ProtocolHandlers::parse_params::<CancelledParams>(params) else {
            warn!("Ignoring malformed notifications/cancelled");
            return;
        };

        let key = request_key(&params.request_id);
        match lock(&self.in_flight).get(&key) {
            Some(token) => {
                info!(
                    "Cancelling request {} ({})",
                    key,
                    params.reason.as_deref().unwrap_or("no reason given")
                );
                token.cancel();
            }
            None => debug!("Cancel for unknown or finished request {}", key),
        }
    }
}

/// Map key for a request id (`1` and `"1"` stay distinct)
fn request_key(id: &Value) -> String {
    id.to_string()
}

fn lock(in_flight: &InFlight) -> std::sync::MutexGuard<'_, HashMap<String, CancellationToken>> {
    in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
