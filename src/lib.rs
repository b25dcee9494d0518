//! kakao-place-mcp - Korean place recommendations over MCP
//!
//! Looks up places with the Kakao Local keyword search, enriches each
//! candidate with web comments and a representative image, and streams
//! the results to the caller one place at a time.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types
//!   - gateway (Kakao REST API access)
//!   - enrich (per-candidate enrichment)
//!   - orchestrator (search, enrich, stream)
//!   - services (unified service container)
//!
//! - **mcp**: MCP adapter over stdio (depends on core)
//!   - server, handlers, tools, protocol, progress
//!
//! - **cli**: Command-line adapter (depends on core)
//!   - commands, output

// Core domain logic (protocol-agnostic)
pub mod core;

// MCP (Model Context Protocol) adapter
pub mod mcp;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{PlaceError, Result};
pub use core::orchestrator::{PlaceRecommender, ProgressSink};
pub use core::services::Services;
pub use core::types::*;
