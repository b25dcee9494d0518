//! MCP protocol (de)serialization tests

use kakao_place_mcp::core::types::ProgressToken;
use kakao_place_mcp::mcp::protocol::*;
use serde_json::json;

#[test]
fn test_request_deserialization() {
    let request: JsonRpcRequest = serde_json::from_str(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list","params":{}}"#,
    )
    .unwrap();

    assert_eq!(request.jsonrpc, "2.0");
    assert_eq!(request.id, Some(json!(1)));
    assert_eq!(request.method, "tools/list");
    assert!(!request.is_notification());
}

#[test]
fn test_notification_has_no_id() {
    let request: JsonRpcRequest =
        serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();

    assert!(request.is_notification());
    assert!(request.params.is_none());
}

#[test]
fn test_success_response_serialization() {
    let response = JsonRpcResponse::success(Some(json!("abc")), json!({"tools": []}));
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["jsonrpc"], "2.0");
    assert_eq!(value["id"], "abc");
    assert_eq!(value["result"]["tools"], json!([]));
    assert!(value.get("error").is_none());
}

#[test]
fn test_error_response_serialization() {
    let response = JsonRpcResponse::error(None, PARSE_ERROR, "Parse error".to_string());
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["id"], json!(null));
    assert_eq!(value["error"]["code"], -32700);
    assert_eq!(value["error"]["message"], "Parse error");
    assert!(value.get("result").is_none());
}

#[test]
fn test_initialize_params_accept_minimal_body() {
    let params: InitializeParams = serde_json::from_value(json!({})).unwrap();
    assert!(params.client_info.is_none());

    let params: InitializeParams = serde_json::from_value(json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {},
        "clientInfo": {"name": "claude", "version": "1.0"}
    }))
    .unwrap();
    assert_eq!(params.client_info.unwrap().name, "claude");
}

#[test]
fn test_tool_schema_uses_input_schema_key() {
    let schema = ToolSchema {
        name: "kakao_map_place_recommender".to_string(),
        description: "d".to_string(),
        input_schema: json!({"type": "object"}),
    };
    let value = serde_json::to_value(&schema).unwrap();

    assert_eq!(value["inputSchema"]["type"], "object");
    assert!(value.get("input_schema").is_none());
}

#[test]
fn test_tool_call_progress_token_variants() {
    let numeric: ToolCallParams = serde_json::from_value(json!({
        "name": "kakao_map_place_recommender",
        "arguments": {"query": "강남역 맛집"},
        "_meta": {"progressToken": 42}
    }))
    .unwrap();
    assert_eq!(numeric.progress_token(), Some(ProgressToken::from(42)));

    let null: ToolCallParams = serde_json::from_value(json!({
        "name": "kakao_map_place_recommender",
        "_meta": {"progressToken": null}
    }))
    .unwrap();
    assert!(null.progress_token().is_none());
}

#[test]
fn test_error_tool_result_serialization() {
    let result = ToolResult {
        content: vec![ContentBlock::Text {
            text: "Query is empty".to_string(),
        }],
        is_error: true,
    };
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["isError"], true);
    assert_eq!(value["content"][0]["type"], "text");
    assert_eq!(value["content"][0]["text"], "Query is empty");
}

#[test]
fn test_progress_notification_shape() {
    let params = ProgressParams {
        progress_token: ProgressToken::from("p-1"),
        progress: 3,
        message: Some("{}".to_string()),
    };
    let notification =
        JsonRpcNotification::new("notifications/progress", serde_json::to_value(params).unwrap());
    let value = serde_json::to_value(&notification).unwrap();

    assert!(value.get("id").is_none());
    assert_eq!(value["params"]["progressToken"], "p-1");
    assert_eq!(value["params"]["progress"], 3);
    assert_eq!(value["params"]["message"], "{}");
}

#[test]
fn test_cancelled_params() {
    let params: CancelledParams =
        serde_json::from_value(json!({"requestId": 7, "reason": "user aborted"})).unwrap();

    assert_eq!(params.request_id, json!(7));
    assert_eq!(params.reason.as_deref(), Some("user aborted"));
}
