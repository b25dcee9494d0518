//! kakao_map_place_recommender tool handler
//!
//! Streams the rendering guidance and one enriched place per progress
//! notification, then returns a short completion result.

use super::handler::{error_content, text_content, McpToolHandler, ToolContext};
use crate::core::error::PlaceError;
use crate::core::orchestrator::{PlaceRecommender, COMPLETION_MESSAGE};
use crate::core::types::SearchRequest;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const TOOL_NAME: &str = "kakao_map_place_recommender";

pub struct PlaceRecommenderHandler {
    recommender: Arc<PlaceRecommender>,
}

impl PlaceRecommenderHandler {
    pub fn new(recommender: Arc<PlaceRecommender>) -> Self {
        Self { recommender }
    }
}

/// Text of the `isError` result for a failed run
fn failure_text(err: &PlaceError) -> String {
    match err {
        PlaceError::MissingCredential => {
            "Tool Execution Failed: KAKAO_API_KEY is not configured.".to_string()
        }
        PlaceError::InvalidQuery(msg) => msg.clone(),
        e if e.is_upstream_error() => format!("Failed to fetch places: {e}"),
        e => format!("Tool Execution Failed: {e}"),
    }
}

#[async_trait]
impl McpToolHandler for PlaceRecommenderHandler {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.to_string(),
            description: "Recommends relevant places in South Korea based on user queries. \
                         Results are streamed as progress notifications: first the rendering \
                         instructions, then one JSON object per place with its address, category, \
                         contact, a representative image and web comments."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Korean keywords for searching places in South Korea. Typically combines \
                                       place type and location (e.g., '이태원 맛집', '서울 병원', '강남역 영화관').",
                        "minLength": 1
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: Value, ctx: ToolContext) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        struct RecommendArgs {
            query: String,
        }

        let args: RecommendArgs =
            serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

        if ctx.progress_token.is_none() {
            tracing::warn!("tools/call without a progress token; places will not be streamed");
        }

        let request = SearchRequest::new(args.query);
        match self
            .recommender
            .recommend(&request, &ctx.progress_token, &*ctx.sink, &ctx.cancel)
            .await
        {
            Ok(_) => Ok(text_content(COMPLETION_MESSAGE.to_string())),
            Err(PlaceError::Cancelled) => Err(McpError::Cancelled),
            Err(e) => {
                tracing::error!("{} failed: {}", TOOL_NAME, e);
                Ok(error_content(failure_text(&e)))
            }
        }
    }
}
