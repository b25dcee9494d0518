//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of the MCP and CLI adapters.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **gateway**: Kakao REST API access
//! - **enrich**: Per-candidate enrichment worker
//! - **orchestrator**: Search, enrich and stream pipeline
//! - **services**: Unified service container

pub mod config;
pub mod enrich;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod services;
pub mod types;

// Re-export key types for convenience
pub use config::Config;
pub use error::{PlaceError, Result};
pub use orchestrator::{PlaceRecommender, ProgressSink};
pub use services::Services;
