//! Integration tests for the LLM client against a simulated provider.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use sdrbot_core::SdrbotError;
use sdrbot_llm::{LlmClient, LlmGateway, ModelConfig};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> LlmClient {
    LlmClient::new(ModelConfig {
        api_key: "test-key".to_string(),
        api_base_url: Some(server.uri()),
        ..ModelConfig::default()
    })
}

#[tokio::test]
async fn test_success_returns_completion_text_unmodified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "Hello Ada!  "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).complete("greet the visitor").await.unwrap();
    assert_eq!(reply, "Hello Ada!  ");
}

#[tokio::test]
async fn test_request_body_carries_model_and_single_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "meta-llama/llama-3.3-70b-instruct:free",
            "messages": [{"role": "user", "content": "hi there"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).complete("hi there").await.unwrap();
}

#[tokio::test]
async fn test_non_success_status_fails_with_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream on fire"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("greet").await.unwrap_err();
    match err {
        SdrbotError::Llm(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("upstream on fire"));
        }
        other => panic!("expected Llm error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_well_formed_200_with_wrong_shape_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).complete("greet").await.unwrap_err();
    assert!(matches!(err, SdrbotError::Llm(_)));
}

#[tokio::test]
async fn test_unreachable_provider_is_a_transport_failure() {
    // Non-routable port: the connection fails before any HTTP exchange.
    let client = LlmClient::new(ModelConfig {
        api_base_url: Some("http://127.0.0.1:1".to_string()),
        ..ModelConfig::default()
    });
    let err = client.complete("greet").await.unwrap_err();
    assert!(matches!(err, SdrbotError::Llm(_)));
}
