//! Error types for the place recommender.
//!
//! This module defines the error types used by the core pipeline.
//! Protocol-specific handling (MCP error codes, tool error results)
//! lives in the respective adapter modules.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, PlaceError>;

/// Main error type for the core pipeline
#[derive(Error, Debug)]
pub enum PlaceError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("KAKAO_API_KEY is not configured")]
    MissingCredential,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{endpoint} request failed with status: {status}")]
    Upstream { endpoint: String, status: u16 },

    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Progress delivery failed: {0}")]
    Delivery(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl PlaceError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Rejected before any network activity (bad query, no credential)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PlaceError::InvalidQuery(_) | PlaceError::MissingCredential
        )
    }

    /// Failure reported by, or while talking to, an upstream endpoint
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            PlaceError::Upstream { .. } | PlaceError::Transport { .. } | PlaceError::Decode { .. }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PlaceError::Cancelled)
    }
}
