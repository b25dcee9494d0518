//! Per-candidate enrichment worker
//!
//! Fetches comments and an image for one candidate concurrently and
//! joins both before deciding. Enrichment is all-or-nothing: if either
//! call fails the candidate is reported as failed, never half-filled.

use crate::core::error::PlaceError;
use crate::core::gateway::UpstreamGateway;
use crate::core::types::{EnrichedPlace, PlaceCandidate};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a candidate produced no `EnrichedPlace`
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error(
        "Failed to enrich '{place}' (comments: {}, image: {})",
        describe(.comments),
        describe(.image)
    )]
    Failed {
        place: String,
        comments: Option<PlaceError>,
        image: Option<PlaceError>,
    },

    #[error("Enrichment of '{place}' was cancelled")]
    Cancelled { place: String },
}

fn describe(error: &Option<PlaceError>) -> String {
    match error {
        Some(e) => e.to_string(),
        None => "ok".to_string(),
    }
}

impl EnrichmentError {
    pub fn place(&self) -> &str {
        match self {
            EnrichmentError::Failed { place, .. } | EnrichmentError::Cancelled { place } => place,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, EnrichmentError::Cancelled { .. })
    }
}

/// Turns one `PlaceCandidate` into one `EnrichedPlace`
#[derive(Clone)]
pub struct PlaceEnricher {
    gateway: Arc<dyn UpstreamGateway>,
}

impl PlaceEnricher {
    pub fn new(gateway: Arc<dyn UpstreamGateway>) -> Self {
        Self { gateway }
    }

    /// Enrich `candidate`, abandoning both calls if `cancel` fires
    pub async fn enrich(
        &self,
        candidate: &PlaceCandidate,
        cancel: &CancellationToken,
    ) -> Result<EnrichedPlace, EnrichmentError> {
        let name = candidate.name.as_str();

        let both = async {
            tokio::join!(
                self.gateway.fetch_comments(name),
                self.gateway.fetch_image(name)
            )
        };

        let (comments, image) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(EnrichmentError::Cancelled {
                    place: candidate.name.clone(),
                });
            }
            settled = both => settled,
        };

        match (comments, image) {
            (Ok(comments), Ok(image)) => {
                tracing::debug!(
                    "Enriched '{}' with {} comment(s), image: {}",
                    name,
                    comments.len(),
                    image.is_some()
                );
                Ok(EnrichedPlace::new(candidate.clone(), comments, image))
            }
            (comments, image) => Err(EnrichmentError::Failed {
                place: candidate.name.clone(),
                comments: comments.err(),
                image: image.err(),
            }),
        }
    }
}
