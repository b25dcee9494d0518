//! Enrichment worker tests

use crate::common::{candidate, MockGateway};
use kakao_place_mcp::core::enrich::{EnrichmentError, PlaceEnricher};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_enrich_attaches_comments_and_image() {
    let gateway = Arc::new(MockGateway::default());
    let enricher = PlaceEnricher::new(gateway.clone());

    let enriched = enricher
        .enrich(&candidate("을지로골뱅이"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(enriched.name(), "을지로골뱅이");
    assert_eq!(enriched.comments.len(), 1);
    assert_eq!(
        enriched.image_url.as_deref(),
        Some("https://img.example/을지로골뱅이.jpg")
    );
    assert_eq!(gateway.comment_queries(), vec!["을지로골뱅이".to_string()]);
}

#[tokio::test]
async fn test_enrich_missing_image_is_not_a_failure() {
    let gateway = Arc::new(MockGateway::default().no_image_for("A"));
    let enricher = PlaceEnricher::new(gateway);

    let enriched = enricher
        .enrich(&candidate("A"), &CancellationToken::new())
        .await
        .unwrap();

    assert!(enriched.image_url.is_none());
    let payload: serde_json::Value = serde_json::from_str(&enriched.to_payload().unwrap()).unwrap();
    assert_eq!(payload["image_url"], "");
}

#[tokio::test]
async fn test_enrich_comment_failure_fails_whole_candidate() {
    let gateway = Arc::new(MockGateway::default().fail_comments_for("A"));
    let enricher = PlaceEnricher::new(gateway.clone());

    let err = enricher
        .enrich(&candidate("A"), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        EnrichmentError::Failed {
            place,
            comments,
            image,
        } => {
            assert_eq!(place, "A");
            assert!(comments.is_some());
            assert!(image.is_none());
        }
        other => panic!("unexpected error: {other}"),
    }
    // Both calls still ran to completion
    assert_eq!(gateway.image_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_enrich_reports_both_failures() {
    let gateway = Arc::new(MockGateway::default().fail_comments_for("A").fail_image_for("A"));
    let enricher = PlaceEnricher::new(gateway);

    let err = enricher
        .enrich(&candidate("A"), &CancellationToken::new())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("web search"), "{message}");
    assert!(message.contains("image search"), "{message}");
}

#[tokio::test]
async fn test_enrich_runs_both_calls_concurrently() {
    let gateway = Arc::new(MockGateway::default().with_delay(Duration::from_millis(30)));
    let enricher = PlaceEnricher::new(gateway.clone());

    enricher
        .enrich(&candidate("A"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(gateway.max_in_flight(), 2);
}

#[tokio::test]
async fn test_enrich_observes_cancellation() {
    let gateway = Arc::new(MockGateway::default().with_delay(Duration::from_secs(30)));
    let enricher = PlaceEnricher::new(gateway);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        enricher.enrich(&candidate("A"), &cancel),
    )
    .await
    .expect("cancellation should end enrichment promptly")
    .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.place(), "A");
}
