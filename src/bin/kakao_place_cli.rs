//! kakao-place CLI - place recommendations from the terminal
//!
//! Runs the same pipeline as the MCP server and prints the results.
//!
//! # Examples
//!
//! ```bash
//! # Recommend places
//! kakao-place search 강남역 맛집
//!
//! # One JSON line per streamed message
//! kakao-place --format json kakao-map-place-recommender "이태원 맛집"
//!
//! # Show configuration
//! kakao-place show-config
//! ```

use clap::Parser;
use kakao_place_mcp::cli::output::print_error;
use kakao_place_mcp::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false);

    if std::env::var("KAKAO_PLACE_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
