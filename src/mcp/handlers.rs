//! MCP protocol method handlers

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::progress::McpProgressSink;
use crate::mcp::protocol::*;
use crate::mcp::tools::{PlaceRecommenderHandler, ToolContext, ToolRegistry};
use crate::mcp::transport::StdioTransport;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const SERVER_NAME: &str = "kakao-place-mcp";

pub struct ProtocolHandlers {
    initialized: AtomicBool,
    tool_registry: ToolRegistry,
    transport: Arc<StdioTransport>,
}

impl ProtocolHandlers {
    pub fn new(services: Arc<Services>, transport: Arc<StdioTransport>) -> Self {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(PlaceRecommenderHandler::new(Arc::clone(
            &services.recommender,
        ))));

        Self {
            initialized: AtomicBool::new(false),
            tool_registry: registry,
            transport,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Handle initialize request
    pub async fn handle_initialize(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let params: InitializeParams =
            serde_json::from_value(request.params.unwrap_or_else(|| json!({})))?;

        match &params.client_info {
            Some(client) => info!("Client initialized: {} {}", client.name, client.version),
            None => info!("Client initialized"),
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }

    /// Handle initialized notification
    pub async fn handle_initialized(
        &self,
        _request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        self.initialized.store(true, Ordering::SeqCst);
        info!("Server initialized");

        // Initialized is a notification, no response needed
        Ok(JsonRpcResponse::empty())
    }

    /// Handle tools/list request
    pub async fn handle_tools_list(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let tools = self.tool_registry.list();

        Ok(JsonRpcResponse::success(request.id, json!({ "tools": tools })))
    }

    /// Handle tools/call request
    ///
    /// Returns `McpError::Cancelled` if `cancel` fired during the call;
    /// the caller must not send a response in that case.
    pub async fn handle_tools_call(
        &self,
        request: JsonRpcRequest,
        cancel: CancellationToken,
    ) -> Result<JsonRpcResponse, McpError> {
        let params_value = match request.params.clone() {
            Some(v) => v,
            None => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    INVALID_PARAMS,
                    "Missing params".to_string(),
                ));
            }
        };

        let params: ToolCallParams = match serde_json::from_value(params_value) {
            Ok(p) => p,
            Err(e) => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                ));
            }
        };

        let handler = match self.tool_registry.get(&params.name) {
            Some(h) => h,
            None => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    INVALID_REQUEST,
                    format!("Tool not found: {}", params.name),
                ));
            }
        };

        let ctx = ToolContext {
            progress_token: params.progress_token().unwrap_or_default(),
            sink: Arc::new(McpProgressSink::new(Arc::clone(&self.transport))),
            cancel,
        };

        match handler.execute(params.arguments, ctx).await {
            Ok(result) => Ok(JsonRpcResponse::success(
                request.id,
                serde_json::to_value(result)?,
            )),
            Err(McpError::Cancelled) => Err(McpError::Cancelled),
            Err(e) => {
                let (code, message) = e.code_and_message();
                Ok(JsonRpcResponse::error(request.id, code, message))
            }
        }
    }

    /// Handle ping request
    pub async fn handle_ping(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse, McpError> {
        Ok(JsonRpcResponse::success(request.id, json!({})))
    }

    /// Route a request that is answered inline (everything but tools/call)
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse, McpError> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await,
            "initialized" | "notifications/initialized" => {
                self.handle_initialized(request).await
            }
            "tools/list" => self.handle_tools_list(request).await,
            "tools/call" => {
                self.handle_tools_call(request, CancellationToken::new())
                    .await
            }
            "ping" => self.handle_ping(request).await,
            _ if request.is_notification() => Ok(JsonRpcResponse::empty()),
            _ => Ok(JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Unknown method: {}", request.method),
            )),
        }
    }

    /// Parse a raw `params` object, for notifications with no response
    pub fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Option<T> {
        params.and_then(|p| serde_json::from_value(p).ok())
    }
}
