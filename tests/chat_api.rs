use async_trait::async_trait;
use axum::body::{ to_bytes, Body };
use axum::http::{ Method, Request, StatusCode };
use axum::Router;
use grants_chat::agent::fallback::fallback_response;
use grants_chat::agent::GrantsAgent;
use grants_chat::config::prompt::GRANTS_SYSTEM_PROMPT;
use grants_chat::config::secret::{ ApiKeyCache, StaticSecretStore };
use grants_chat::handler::ChatHandler;
use grants_chat::error::StoreError;
use grants_chat::history::{ HistoryStore, InMemoryHistoryStore };
use grants_chat::llm::chat::new_client;
use grants_chat::llm::LlmConfig;
use grants_chat::models::chat::{ ConversationTurn, Sender };
use grants_chat::server::api::{ router, ALLOW_HEADERS, ALLOW_METHODS };
use httpmock::prelude::*;
use serde_json::{ json, Value };
use std::sync::Arc;
use tower::ServiceExt;

struct UnavailableTable;

#[async_trait]
impl HistoryStore for UnavailableTable {
    async fn put_turn(&self, _turn: &ConversationTurn) -> Result<(), StoreError> {
        Err(StoreError::Write {
            table: "GrantsConversations".to_string(),
            message: "ResourceNotFoundException".to_string(),
        })
    }
}

fn app(base_url: String) -> (Router, Arc<InMemoryHistoryStore>) {
    let store = Arc::new(InMemoryHistoryStore::new());
    (app_with_store(base_url, store.clone()), store)
}

fn app_with_store(base_url: String, store: Arc<dyn HistoryStore>) -> Router {
    let client = new_client(&LlmConfig {
        base_url,
        completion_model: "claude-test".to_string(),
        max_tokens: 1024,
        timeout_secs: Some(5),
    }).expect("chat client should be created");
    let api_key = ApiKeyCache::new(Arc::new(StaticSecretStore::new("sk-test")), "/prod/anthropic-api-key");
    let handler = ChatHandler::new(store, GrantsAgent::new(client, api_key));
    router(Arc::new(handler))
}

fn post(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_cors_headers(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-headers"], ALLOW_HEADERS);
    assert_eq!(headers["access-control-allow-methods"], ALLOW_METHODS);
    assert_eq!(headers["content-type"], "application/json");
}

#[tokio::test]
async fn preflight_returns_cors_headers_and_empty_body() {
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(POST);
        then.status(200);
    });
    let (app, store) = app(server.base_url());

    let response = app
        .oneshot(Request::builder().method(Method::OPTIONS).uri("/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
    assert!(store.turns().is_empty());
    api.assert_hits(0);
}

#[tokio::test]
async fn post_returns_generated_reply_and_persists_both_turns() {
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .header("x-api-key", "sk-test")
            .json_body_includes(
                json!({
                    "max_tokens": 1024,
                    "system": GRANTS_SYSTEM_PROMPT,
                    "messages": [{"role": "user", "content": "Outline my proposal"}]
                }).to_string()
            );
        then.status(200).json_body(json!({
            "content": [{"type": "text", "text": "Start with an executive summary."}]
        }));
    });
    let (app, store) = app(server.base_url());

    let response = app
        .oneshot(post(r#"{"message":"Outline my proposal","conversationId":"conv-1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors_headers(&response);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Start with an executive summary.");
    assert_eq!(body["conversationId"], "conv-1");
    api.assert();

    let turns = store.conversation("conv-1");
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].sender, Sender::User);
    assert_eq!(turns[1].sender, Sender::Assistant);
    assert_eq!(body["timestamp"], turns[1].timestamp.as_str());
}

#[tokio::test]
async fn api_failure_degrades_to_fallback_reply() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(529).json_body(json!({"type": "error", "error": {"type": "overloaded_error"}}));
    });
    let (app, store) = app(server.base_url());

    let response = app.oneshot(post(r#"{"message":"help me write a grant budget"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], fallback_response("help me write a grant budget"));
    assert!(body["conversationId"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(store.turns().len(), 2);
}

#[tokio::test]
async fn missing_message_is_a_400() {
    let server = MockServer::start();
    let (app, store) = app(server.base_url());

    let response = app.oneshot(post(r#"{"conversationId":"conv-2"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors_headers(&response);
    assert_eq!(read_json(response).await, json!({"error": "Message is required"}));
    assert!(store.turns().is_empty());
}

#[tokio::test]
async fn storage_failure_is_a_json_500_with_cors_headers() {
    let server = MockServer::start();
    let api = server.mock(|when, then| {
        when.method(POST);
        then.status(200);
    });
    let app = app_with_store(server.base_url(), Arc::new(UnavailableTable));

    let response = app.oneshot(post(r#"{"message":"hello"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors_headers(&response);
    let body = read_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Internal server error: "));
    assert!(error.contains("ResourceNotFoundException"));
    api.assert_hits(0);
}

#[tokio::test]
async fn oversized_body_is_rejected_with_a_json_error() {
    let server = MockServer::start();
    let (app, store) = app(server.base_url());
    let message = "a".repeat(3 * 1024 * 1024);

    let response = app
        .oneshot(post(&json!({ "message": message }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_cors_headers(&response);
    let body = read_json(response).await;
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(store.turns().is_empty());
}
