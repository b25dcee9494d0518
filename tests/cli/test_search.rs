//! Tests for the kakao-map-place-recommender command

use crate::common::{create_test_services, MockGateway};
use kakao_place_mcp::cli::commands::search::{execute, SearchArgs, TerminalSink};
use kakao_place_mcp::cli::OutputFormat;
use kakao_place_mcp::core::orchestrator::RENDERING_GUIDANCE;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn args(query: &[&str]) -> SearchArgs {
    SearchArgs {
        query: query.iter().map(|s| s.to_string()).collect(),
        show_guidance: false,
    }
}

#[tokio::test]
async fn test_search_runs_pipeline() {
    let gateway = Arc::new(MockGateway::with_places(&["A", "B"]));
    let services = Arc::new(create_test_services(gateway.clone()));

    execute(args(&["강남역", "맛집"]), &services, OutputFormat::Json)
        .await
        .unwrap();

    assert_eq!(gateway.place_queries(), vec!["강남역 맛집".to_string()]);
    assert_eq!(gateway.comment_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_search_blank_query_fails_without_calls() {
    let gateway = Arc::new(MockGateway::with_places(&["A"]));
    let services = Arc::new(create_test_services(gateway.clone()));

    let err = execute(args(&[" "]), &services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Query is empty"));
    assert_eq!(gateway.total_calls(), 0);
}

#[tokio::test]
async fn test_search_upstream_failure_is_reported() {
    let gateway = Arc::new(MockGateway::failing_places(503));
    let services = Arc::new(create_test_services(gateway));

    let err = execute(args(&["강남역"]), &services, OutputFormat::Human)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("503"));
}

#[test]
fn test_terminal_sink_skips_guidance_in_human_mode() {
    let sink = TerminalSink::new(OutputFormat::Human, false);
    assert!(sink.render(RENDERING_GUIDANCE).is_none());

    let sink = TerminalSink::new(OutputFormat::Human, true);
    assert!(sink
        .render(RENDERING_GUIDANCE)
        .unwrap()
        .starts_with("Using the provided JSON results"));
}

#[test]
fn test_terminal_sink_json_lines() {
    let sink = TerminalSink::new(OutputFormat::Json, false);
    let line = sink.render(RENDERING_GUIDANCE).unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();

    assert_eq!(value["progress"], 1);
    assert_eq!(value["message"], RENDERING_GUIDANCE);
}
