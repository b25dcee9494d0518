//! kakao-place MCP (Model Context Protocol) Server
//!
//! A stdio-based MCP server that exposes the `kakao_map_place_recommender`
//! tool to MCP clients. Logs go to stderr; stdout carries protocol only.

use kakao_place_mcp::core::config::Config;
use kakao_place_mcp::core::services::Services;
use kakao_place_mcp::mcp::McpServer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr) // Critical: stderr not stdout
        .with_env_filter(filter)
        .with_ansi(false); // No color codes

    if std::env::var("KAKAO_PLACE_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::process::exit(1);
    });

    if let Err(e) = config.require_api_key() {
        tracing::error!("{}", e);
        eprintln!("{e}");
        std::process::exit(1);
    }
    config.log_config();

    // Create services
    let services = match Services::new(config) {
        Ok(services) => Arc::new(services),
        Err(e) => {
            eprintln!("Failed to initialize services: {e}");
            std::process::exit(1);
        }
    };

    // Create and run MCP server
    let server = McpServer::new(services);

    if let Err(e) = server.run().await {
        eprintln!("MCP server error: {e}");
        std::process::exit(1);
    }
}
