//! CLI adapter for the place recommender
//!
//! Runs the same recommendation pipeline as the MCP server, printing
//! each streamed place to the terminal instead of sending progress
//! notifications. This module is parallel to `mcp/` - both depend on
//! `core/` but not on each other.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      mcp/        |      |      cli/        |
//! | (stdio adapter)  |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// kakao-place - Korean place recommendations from the Kakao APIs
///
/// Searches places by keyword, then attaches web comments and a
/// representative image to every result.
#[derive(Parser, Debug)]
#[command(name = "kakao-place")]
#[command(version)]
#[command(about = "Korean place recommender backed by Kakao search", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
///
/// Command names match MCP tool names (underscores become hyphens).
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend places for a Korean keyword query
    #[command(name = "kakao-map-place-recommender", visible_alias = "search")]
    KakaoMapPlaceRecommender(commands::SearchArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  kakao-place completions bash > ~/.local/share/bash-completion/completions/kakao-place
    ///   zsh:   kakao-place completions zsh > ~/.zfunc/_kakao-place
    ///   fish:  kakao-place completions fish > ~/.config/fish/completions/kakao-place.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use std::sync::Arc;

    // Handle completions command early (doesn't need configuration)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // Load configuration
    let config = Config::load()?;

    // Execute command
    match cli.command {
        Commands::KakaoMapPlaceRecommender(args) => {
            let services = Arc::new(Services::new(config)?);
            commands::search::execute(args, &services, cli.format).await
        }
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
