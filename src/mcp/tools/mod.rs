//! MCP tool implementations

pub mod handler;
pub mod place_recommender;
pub mod registry;

pub use handler::{error_content, text_content, McpToolHandler, ToolContext};
pub use place_recommender::PlaceRecommenderHandler;
pub use registry::ToolRegistry;
