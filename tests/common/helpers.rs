// Test helper functions: in-memory gateway and progress sink

use super::fixtures::candidates;
use async_trait::async_trait;
use kakao_place_mcp::core::config::{ApiKey, Config};
use kakao_place_mcp::core::error::{PlaceError, Result};
use kakao_place_mcp::core::gateway::UpstreamGateway;
use kakao_place_mcp::core::orchestrator::ProgressSink;
use kakao_place_mcp::core::services::Services;
use kakao_place_mcp::core::types::{CommentDocument, ImageResult, PlaceCandidate, ProgressToken};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default config with an API key set
#[allow(dead_code)] // Used in integration tests
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.kakao.api_key = Some(ApiKey::new("test-key"));
    config
}

/// Services around a mock gateway
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(gateway: Arc<MockGateway>) -> Services {
    Services::with_gateway(test_config(), gateway)
}

/// In-memory `UpstreamGateway` with call counters and scripted failures
#[derive(Default)]
pub struct MockGateway {
    places: Vec<PlaceCandidate>,
    places_status: Option<u16>,
    failing_comments: HashSet<String>,
    failing_images: HashSet<String>,
    missing_images: HashSet<String>,
    delay: Duration,

    pub place_calls: AtomicUsize,
    pub comment_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    place_queries: Mutex<Vec<String>>,
    comment_queries: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn with_places(names: &[&str]) -> Self {
        Self {
            places: candidates(names),
            ..Default::default()
        }
    }

    /// Keyword search fails with `status`
    pub fn failing_places(status: u16) -> Self {
        Self {
            places_status: Some(status),
            ..Default::default()
        }
    }

    pub fn fail_comments_for(mut self, name: &str) -> Self {
        self.failing_comments.insert(name.to_string());
        self
    }

    pub fn fail_image_for(mut self, name: &str) -> Self {
        self.failing_images.insert(name.to_string());
        self
    }

    pub fn no_image_for(mut self, name: &str) -> Self {
        self.missing_images.insert(name.to_string());
        self
    }

    /// Every call sleeps this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn total_calls(&self) -> usize {
        self.place_calls.load(Ordering::SeqCst)
            + self.comment_calls.load(Ordering::SeqCst)
            + self.image_calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn place_queries(&self) -> Vec<String> {
        self.place_queries.lock().unwrap().clone()
    }

    pub fn comment_queries(&self) -> Vec<String> {
        self.comment_queries.lock().unwrap().clone()
    }

    async fn simulate_call(&self) {
        let _guard = InFlightGuard::enter(&self.in_flight, &self.max_in_flight);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize, max: &AtomicUsize) -> Self {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        max.fetch_max(now, Ordering::SeqCst);
        Self(in_flight)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn upstream(endpoint: &str, status: u16) -> PlaceError {
    PlaceError::Upstream {
        endpoint: endpoint.to_string(),
        status,
    }
}

#[async_trait]
impl UpstreamGateway for MockGateway {
    async fn fetch_places(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
        self.place_calls.fetch_add(1, Ordering::SeqCst);
        self.place_queries.lock().unwrap().push(query.to_string());
        self.simulate_call().await;

        match self.places_status {
            Some(status) => Err(upstream("keyword search", status)),
            None => Ok(self.places.clone()),
        }
    }

    async fn fetch_comments(&self, query: &str) -> Result<Vec<CommentDocument>> {
        self.comment_calls.fetch_add(1, Ordering::SeqCst);
        self.comment_queries.lock().unwrap().push(query.to_string());
        self.simulate_call().await;

        if self.failing_comments.contains(query) {
            return Err(upstream("web search", 500));
        }
        Ok(vec![CommentDocument {
            title: format!("{query} 후기"),
            contents: format!("{query} 정말 맛있어요"),
        }])
    }

    async fn fetch_image(&self, query: &str) -> Result<Option<ImageResult>> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_call().await;

        if self.failing_images.contains(query) {
            return Err(upstream("image search", 500));
        }
        if self.missing_images.contains(query) {
            return Ok(None);
        }
        Ok(Some(ImageResult {
            image_url: format!("https://img.example/{query}.jpg"),
        }))
    }
}

/// `ProgressSink` recording every message in order
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(ProgressToken, String)>>,
    attempts: AtomicUsize,
    fail_on: Option<usize>,
    cancel_after: Option<(usize, CancellationToken)>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivery attempts, failed ones included
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// The `n`th message (1-based) fails to deliver and is not recorded
    pub fn failing_on(n: usize) -> Self {
        Self {
            fail_on: Some(n),
            ..Default::default()
        }
    }

    /// Cancel `token` right after the `n`th message is recorded
    pub fn cancelling_after(n: usize, token: CancellationToken) -> Self {
        Self {
            cancel_after: Some((n, token)),
            ..Default::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn tokens(&self) -> Vec<ProgressToken> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(t, _)| t.clone())
            .collect()
    }

    /// Place payloads (every message after the guidance), parsed
    pub fn places(&self) -> Vec<serde_json::Value> {
        self.messages()
            .iter()
            .skip(1)
            .map(|m| serde_json::from_str(m).expect("payload is JSON"))
            .collect()
    }

    pub fn place_names(&self) -> Vec<String> {
        self.places()
            .iter()
            .map(|p| p["place_name"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn emit(&self, token: &ProgressToken, message: String) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(attempt) {
            return Err(PlaceError::Delivery("sink closed".to_string()));
        }
        self.messages
            .lock()
            .unwrap()
            .push((token.clone(), message));

        if let Some((n, cancel)) = &self.cancel_after {
            if attempt == *n {
                cancel.cancel();
            }
        }
        Ok(())
    }
}
