//! Place recommendation pipeline
//!
//! Validate, announce, fetch candidates, then enrich and stream them one
//! at a time in place-search order. Each candidate's enrichment runs its
//! two upstream calls concurrently, so at most two outbound requests are
//! in flight at any instant and delivery order is deterministic.

use crate::core::config::Config;
use crate::core::enrich::{EnrichmentError, PlaceEnricher};
use crate::core::error::{PlaceError, Result};
use crate::core::gateway::UpstreamGateway;
use crate::core::types::{ProgressToken, SearchRequest, SearchSummary};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Rendering guidance sent before any data
pub const RENDERING_GUIDANCE: &str = r#"
Using the provided JSON results, compile a detailed and visually appealing Markdown summary for the user.

Each place **MUST** include:

## [{place_name}]({place_url})

![Image]({image_url})

- **Address**: {address_name}
- **Category**: {category_name}
- **Contact**: {phone}
- **Summary**: Briefly summarize the overall sentiment or notable points based on provided comments. Consider aspects such as positive features, negative issues, and unique highlights.

Note:
- The summary should be directly derived by analyzing and condensing the provided comments.
- Ensure all listed elements (title with link, image, address, category, contact, and summary) are always included for every place."#;

/// Final result text of a completed run
pub const COMPLETION_MESSAGE: &str = "Search complete.";

/// Delivery channel for progress messages
///
/// Implemented by the MCP adapter (progress notifications) and the CLI
/// (terminal output); tests record messages in memory.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn emit(&self, token: &ProgressToken, message: String) -> Result<()>;
}

/// Drives one recommendation request end to end
pub struct PlaceRecommender {
    gateway: Arc<dyn UpstreamGateway>,
    enricher: PlaceEnricher,
    credential_configured: bool,
    max_query_length: Option<usize>,
}

impl PlaceRecommender {
    pub fn new(config: &Config, gateway: Arc<dyn UpstreamGateway>) -> Self {
        Self {
            enricher: PlaceEnricher::new(Arc::clone(&gateway)),
            gateway,
            credential_configured: config.has_api_key(),
            max_query_length: config.search.max_query_length,
        }
    }

    /// Run the pipeline, streaming enriched places to `sink`
    ///
    /// Returns `InvalidQuery`/`MissingCredential` before any network
    /// call, the place-search error if candidates cannot be fetched, or
    /// `Cancelled` if `cancel` fires. Otherwise returns a summary; zero
    /// delivered places is still a success.
    pub async fn recommend(
        &self,
        request: &SearchRequest,
        token: &ProgressToken,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<SearchSummary> {
        if !self.credential_configured {
            return Err(PlaceError::MissingCredential);
        }
        let query = request.validated_query(self.max_query_length)?;

        tracing::info!("Recommending places for '{}'", query);

        self.deliver(token, RENDERING_GUIDANCE.to_string(), sink, cancel)
            .await?;

        let candidates = until_cancelled(cancel, self.gateway.fetch_places(query)).await??;
        tracing::info!("Place search returned {} candidate(s)", candidates.len());

        let mut summary = SearchSummary {
            candidates: candidates.len(),
            ..Default::default()
        };

        for candidate in &candidates {
            let enriched = match self.enricher.enrich(candidate, cancel).await {
                Ok(enriched) => enriched,
                Err(EnrichmentError::Cancelled { place }) => {
                    tracing::info!("Cancelled while enriching '{}'", place);
                    return Err(PlaceError::Cancelled);
                }
                Err(e) => {
                    tracing::warn!("Dropping candidate: {}", e);
                    summary.dropped += 1;
                    continue;
                }
            };

            let payload = match enriched.to_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("Dropping '{}': failed to serialize: {}", enriched.name(), e);
                    summary.dropped += 1;
                    continue;
                }
            };

            if self.deliver(token, payload, sink, cancel).await? {
                summary.delivered += 1;
            }
        }

        // A cancel during the last delivery still suppresses completion
        if cancel.is_cancelled() {
            tracing::info!("Search for '{}' cancelled after the last candidate", query);
            return Err(PlaceError::Cancelled);
        }

        tracing::info!(
            "Search for '{}' complete: {} delivered, {} dropped of {} candidate(s)",
            query,
            summary.delivered,
            summary.dropped,
            summary.candidates
        );

        Ok(summary)
    }

    /// Emit one message; `Ok(false)` if the sink failed (logged, not fatal)
    async fn deliver(
        &self,
        token: &ProgressToken,
        message: String,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        if cancel.is_cancelled() {
            return Err(PlaceError::Cancelled);
        }

        match until_cancelled(cancel, sink.emit(token, message)).await? {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!("Failed to deliver progress message: {}", e);
                Ok(false)
            }
        }
    }
}

/// Resolve `future` unless `cancel` fires first
async fn until_cancelled<F: Future>(cancel: &CancellationToken, future: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PlaceError::Cancelled),
        output = future => Ok(output),
    }
}
