//! Upstream gateway over the Kakao local and search REST APIs
//!
//! Three operations, one authenticated GET each. Errors are always
//! reported to the caller; deciding which failures are fatal is the
//! orchestrator's job.

use crate::core::config::Config;
use crate::core::error::{PlaceError, Result};
use crate::core::types::{CommentDocument, DocumentsResponse, ImageResult, PlaceCandidate};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Source of place candidates, comments and images
#[async_trait]
pub trait UpstreamGateway: Send + Sync {
    /// Keyword place search, in upstream relevance order
    async fn fetch_places(&self, query: &str) -> Result<Vec<PlaceCandidate>>;

    /// Web documents about `query`
    async fn fetch_comments(&self, query: &str) -> Result<Vec<CommentDocument>>;

    /// First image for `query`, or `None` when there is none
    async fn fetch_image(&self, query: &str) -> Result<Option<ImageResult>>;
}

/// Kakao REST endpoints used by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    KeywordSearch,
    WebSearch,
    ImageSearch,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::KeywordSearch => "/v2/local/search/keyword.json",
            Endpoint::WebSearch => "/v2/search/web",
            Endpoint::ImageSearch => "/v2/search/image",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Endpoint::KeywordSearch => "keyword search",
            Endpoint::WebSearch => "web search",
            Endpoint::ImageSearch => "image search",
        }
    }
}

/// `reqwest` implementation of [`UpstreamGateway`]
///
/// The client and its connection pool are shared by every call.
#[derive(Debug, Clone)]
pub struct KakaoGateway {
    client: Client,
    base_url: String,
    authorization: String,
    comment_count: usize,
}

impl KakaoGateway {
    /// Build the gateway; fails with `MissingCredential` without an API key
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.kakao.timeout_sec))
            .build()
            .map_err(|e| PlaceError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.kakao.base_url.trim_end_matches('/').to_string(),
            authorization: format!("KakaoAK {}", api_key.expose()),
            comment_count: config.search.comment_count,
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn get_documents<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let transport = move |source: reqwest::Error| PlaceError::Transport {
            endpoint: endpoint.label().to_string(),
            source,
        };

        let response = self
            .client
            .get(self.url(endpoint))
            .header(AUTHORIZATION, &self.authorization)
            .query(params)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaceError::Upstream {
                endpoint: endpoint.label().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        let decoded: DocumentsResponse<T> =
            serde_json::from_slice(&body).map_err(|e| PlaceError::Decode {
                endpoint: endpoint.label().to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            "{} returned {} document(s)",
            endpoint.label(),
            decoded.documents.len()
        );

        Ok(decoded.documents)
    }
}

fn require_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(PlaceError::InvalidQuery("Query is empty".to_string()));
    }
    Ok(query)
}

#[async_trait]
impl UpstreamGateway for KakaoGateway {
    async fn fetch_places(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
        let query = require_query(query)?;
        self.get_documents(Endpoint::KeywordSearch, &[("query", query.to_string())])
            .await
    }

    async fn fetch_comments(&self, query: &str) -> Result<Vec<CommentDocument>> {
        let query = require_query(query)?;
        self.get_documents(
            Endpoint::WebSearch,
            &[
                ("query", query.to_string()),
                ("page", "1".to_string()),
                ("size", self.comment_count.to_string()),
            ],
        )
        .await
    }

    async fn fetch_image(&self, query: &str) -> Result<Option<ImageResult>> {
        let query = require_query(query)?;
        let images: Vec<ImageResult> = self
            .get_documents(
                Endpoint::ImageSearch,
                &[
                    ("query", query.to_string()),
                    ("page", "1".to_string()),
                    ("size", "1".to_string()),
                ],
            )
            .await?;

        Ok(images.into_iter().next())
    }
}
