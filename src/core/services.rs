//! Unified service container
//!
//! Provides shared access to all core services.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::gateway::{KakaoGateway, UpstreamGateway};
use crate::core::orchestrator::PlaceRecommender;
use std::sync::Arc;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Upstream Kakao API gateway (shared HTTP client)
    pub gateway: Arc<dyn UpstreamGateway>,

    /// Recommendation pipeline
    pub recommender: Arc<PlaceRecommender>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services backed by the Kakao REST API
    ///
    /// Fails with `MissingCredential` when no API key is configured.
    pub fn new(config: Config) -> Result<Self> {
        let gateway: Arc<dyn UpstreamGateway> = Arc::new(KakaoGateway::new(&config)?);
        Ok(Self::with_gateway(config, gateway))
    }

    /// Create services around an existing gateway
    pub fn with_gateway(config: Config, gateway: Arc<dyn UpstreamGateway>) -> Self {
        let recommender = Arc::new(PlaceRecommender::new(&config, Arc::clone(&gateway)));

        Self {
            gateway,
            recommender,
            config: Arc::new(config),
        }
    }
}
