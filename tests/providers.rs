use std::time::Duration;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use code_assistant::{ClaudeProvider, GeminiProvider, LLMProvider};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn fake_messages(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}})),
        );
    }
    if headers.get("anthropic-version").is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": {"message": "missing version"}})));
    }

    let model = body["model"].as_str().unwrap_or_default().to_string();
    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
    match model.as_str() {
        "rate-limited" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"type": "error", "error": {"type": "rate_limit_error", "message": "slow down"}})),
        ),
        "empty" => (StatusCode::OK, Json(json!({"content": []}))),
        _ => (
            StatusCode::OK,
            Json(json!({
                "content": [
                    {"type": "text", "text": format!("{} read {} chars", model, prompt.len())},
                    {"type": "tool_use", "id": "ignored"},
                    {"type": "text", "text": " (max_tokens "},
                    {"type": "text", "text": format!("{})", body["max_tokens"])}
                ]
            })),
        ),
    }
}

async fn fake_generate(
    Path(target): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("g-key") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "message": "API key not valid"}})),
        );
    }

    if body["generationConfig"]["maxOutputTokens"] != json!(256) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": 400, "message": "unexpected generationConfig"}})),
        );
    }

    let model = target.trim_end_matches(":generateContent");
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    match model {
        "gemini-missing" => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": 404, "message": "models/gemini-missing is not found"}})),
        ),
        "gemini-blocked" => (
            StatusCode::OK,
            Json(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
        ),
        "gemini-empty" => (StatusCode::OK, Json(json!({"candidates": []}))),
        _ => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {"parts": [
                        {"text": format!("{} saw: ", model)},
                        {"text": prompt}
                    ]}
                }]
            })),
        ),
    }
}

async fn claude_stand_in() -> String {
    spawn(Router::new().route("/v1/messages", post(fake_messages))).await
}

async fn gemini_stand_in() -> String {
    let base = spawn(Router::new().route("/v1beta/models/:target", post(fake_generate))).await;
    format!("{}/v1beta", base)
}

#[tokio::test]
async fn test_claude_joins_text_blocks() {
    let base = claude_stand_in().await;
    let provider = ClaudeProvider::new("test-key".to_string(), 1000, TIMEOUT)
        .unwrap()
        .with_base_url(base);

    let text = provider.complete("claude-sonnet-4-20250514", "hello").await.unwrap();
    assert_eq!(text, "claude-sonnet-4-20250514 read 5 chars (max_tokens 1000)");
    assert_eq!(provider.name(), "Claude");
}

#[tokio::test]
async fn test_claude_http_errors_include_status() {
    let base = claude_stand_in().await;
    let provider = ClaudeProvider::new("test-key".to_string(), 1000, TIMEOUT)
        .unwrap()
        .with_base_url(base.clone());

    let err = provider.complete("rate-limited", "hello").await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("429"));
    assert!(message.contains("slow down"));

    let unauthorized = ClaudeProvider::new("wrong-key".to_string(), 1000, TIMEOUT)
        .unwrap()
        .with_base_url(base);
    let err = unauthorized.complete("any", "hello").await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_claude_empty_content_is_error() {
    let base = claude_stand_in().await;
    let provider = ClaudeProvider::new("test-key".to_string(), 1000, TIMEOUT)
        .unwrap()
        .with_base_url(base);

    let err = provider.complete("empty", "hello").await.unwrap_err();
    assert!(err.to_string().contains("Empty response from Claude"));
}

#[tokio::test]
async fn test_gemini_joins_candidate_parts() {
    let base = gemini_stand_in().await;
    let provider = GeminiProvider::new("g-key".to_string(), 256, TIMEOUT)
        .unwrap()
        .with_base_url(base);

    let text = provider.complete("gemini-2.0-flash", "print(1)").await.unwrap();
    assert_eq!(text, "gemini-2.0-flash saw: print(1)");
    assert_eq!(provider.name(), "Gemini");
}

#[tokio::test]
async fn test_gemini_failures() {
    let base = gemini_stand_in().await;
    let provider = GeminiProvider::new("g-key".to_string(), 256, TIMEOUT)
        .unwrap()
        .with_base_url(base.clone());

    let missing = provider.complete("gemini-missing", "x").await.unwrap_err();
    assert!(missing.to_string().contains("404"));

    let blocked = provider.complete("gemini-blocked", "x").await.unwrap_err();
    assert!(blocked.to_string().contains("SAFETY"));

    let empty = provider.complete("gemini-empty", "x").await.unwrap_err();
    assert!(empty.to_string().contains("Empty response from Gemini"));

    let wrong_key = GeminiProvider::new("nope".to_string(), 256, TIMEOUT)
        .unwrap()
        .with_base_url(base);
    let denied = wrong_key.complete("gemini-2.0-flash", "x").await.unwrap_err();
    assert!(denied.to_string().contains("API key not valid"));
}
