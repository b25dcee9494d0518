//! Configuration management for the place recommender.
//!
//! Configuration is loaded from a TOML file and environment variables,
//! with defaults for everything except the Kakao API key. The result is
//! an explicit struct built once at startup and handed to the gateway
//! and orchestrator constructors.

use crate::core::error::{PlaceError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the user config dir
const APP_DIR: &str = "kakao-place-mcp";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub kakao: KakaoConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Kakao REST API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KakaoConfig {
    /// REST API key, sent as `Authorization: KakaoAK <key>`
    #[serde(default, skip_serializing)]
    pub api_key: Option<ApiKey>,

    /// Base URL shared by the local and search APIs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_sec: u64,
}

/// Search and enrichment configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Web documents fetched per place
    #[serde(default = "default_comment_count")]
    pub comment_count: usize,

    /// Maximum query length in characters; unlimited when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_query_length: Option<usize>,
}

/// Kakao REST API key. Never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://dapi.kakao.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_comment_count() -> usize {
    5
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_sec: default_timeout(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            comment_count: default_comment_count(),
            max_query_length: None,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PlaceError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// Config file lookup order:
    /// 1. KAKAO_PLACE_CONFIG env var
    /// 2. User config dir (~/.config/kakao-place-mcp/config.toml)
    /// 3. ./kakao-place.toml
    /// 4. Defaults
    ///
    /// A `.env` file in the working directory is read first, if present.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {}", e);
            }
        }

        let mut config = match Self::config_file() {
            Some(path) => {
                tracing::debug!("Reading configuration from {:?}", path);
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Locate the configuration file, if any
    pub fn config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("KAKAO_PLACE_CONFIG") {
            return Some(PathBuf::from(path));
        }

        let user_config = dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"));
        if let Some(path) = user_config.filter(|p| p.exists()) {
            return Some(path);
        }

        let local = PathBuf::from("kakao-place.toml");
        local.exists().then_some(local)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(key) = env::var("KAKAO_API_KEY") {
            if !key.trim().is_empty() {
                self.kakao.api_key = Some(ApiKey::new(key.trim()));
            }
        }
        if let Ok(base_url) = env::var("KAKAO_API_BASE_URL") {
            self.kakao.base_url = base_url;
        }
        if let Ok(timeout) = env::var("KAKAO_REQUEST_TIMEOUT_SEC") {
            if let Ok(t) = timeout.parse() {
                self.kakao.timeout_sec = t;
            }
        }

        if let Ok(count) = env::var("KAKAO_COMMENT_COUNT") {
            if let Ok(c) = count.parse() {
                self.search.comment_count = c;
            }
        }
        if let Ok(max_len) = env::var("KAKAO_MAX_QUERY_LENGTH") {
            if let Ok(len) = max_len.parse() {
                self.search.max_query_length = Some(len);
            }
        }
    }

    /// Validate configuration values
    ///
    /// The API key is not checked here so that key-less commands
    /// (show-config, completions) still work; see `require_api_key`.
    pub fn validate(&self) -> Result<()> {
        if self.kakao.base_url.trim().is_empty() {
            return Err(PlaceError::ConfigError(
                "Kakao base URL must not be empty".to_string(),
            ));
        }

        if self.kakao.timeout_sec == 0 {
            return Err(PlaceError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        if !(1..=50).contains(&self.search.comment_count) {
            return Err(PlaceError::ConfigError(
                "Comment count must be between 1 and 50".to_string(),
            ));
        }

        if self.search.max_query_length == Some(0) {
            return Err(PlaceError::ConfigError(
                "Max query length must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// The API key, or `MissingCredential`
    pub fn require_api_key(&self) -> Result<&ApiKey> {
        self.kakao
            .api_key
            .as_ref()
            .ok_or(PlaceError::MissingCredential)
    }

    pub fn has_api_key(&self) -> bool {
        self.kakao.api_key.is_some()
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!(
            "  API key: {}",
            if self.has_api_key() { "set" } else { "NOT SET" }
        );
        tracing::info!("  Base URL: {}", self.kakao.base_url);
        tracing::info!("  Request timeout: {}s", self.kakao.timeout_sec);
        tracing::info!("  Comments per place: {}", self.search.comment_count);
        match self.search.max_query_length {
            Some(len) => tracing::info!("  Max query length: {}", len),
            None => tracing::info!("  Max query length: unlimited"),
        }
    }
}
