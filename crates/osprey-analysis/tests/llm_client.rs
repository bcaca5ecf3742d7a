//! Integration tests for `LlmClient` using wiremock HTTP mocks.

use osprey_analysis::{LlmClient, LlmError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
}

#[tokio::test]
async fn complete_returns_first_choice_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "gemini-2.0-flash",
            "max_tokens": 6000,
            "temperature": 0.3,
            "messages": [{"role": "user", "content": "analyze this"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("the analysis")))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "test-key", 30).expect("client should build");
    let text = client
        .complete("gemini-2.0-flash", "analyze this", 6000, 0.3)
        .await
        .expect("completion should succeed");

    assert_eq!(text, "the analysis");
}

#[tokio::test]
async fn complete_strips_json_fence_from_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_body("```json\n{\"analysis_metadata\": {}}\n```")),
        )
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "k", 30).expect("client should build");
    let text = client.complete("m", "p", 100, 0.0).await.unwrap();
    assert_eq!(text, "{\"analysis_metadata\": {}}");
}

#[tokio::test]
async fn complete_trims_whitespace() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("  padded  \n")))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "k", 30).expect("client should build");
    assert_eq!(client.complete("m", "p", 100, 0.0).await.unwrap(), "padded");
}

#[tokio::test]
async fn upstream_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "k", 30).expect("client should build");
    let err = client
        .complete("m", "p", 100, 0.0)
        .await
        .expect_err("503 should be an error");

    assert!(
        matches!(err, LlmError::Api { status: 503, ref message } if message == "overloaded"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn missing_content_maps_to_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "k", 30).expect("client should build");
    let err = client
        .complete("m", "p", 100, 0.0)
        .await
        .expect_err("empty choices should be an error");

    assert!(matches!(err, LlmError::EmptyResponse), "got {err:?}");
}

#[tokio::test]
async fn whitespace_only_content_maps_to_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("   \n  ")))
        .mount(&server)
        .await;

    let client = LlmClient::new(&server.uri(), "k", 30).expect("client should build");
    let err = client
        .complete("m", "p", 100, 0.0)
        .await
        .expect_err("blank content should be an error");

    assert!(matches!(err, LlmError::EmptyResponse), "got {err:?}");
}
