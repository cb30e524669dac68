//! LLM client tests against a mocked HTTP server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reviewlens::llm::{
    ChatMessage, CompletionRequest, CompletionService, LlmClient, LlmConfig, LlmError, LlmProvider,
};

fn ollama(server: &MockServer) -> LlmClient {
    let config = LlmConfig::base_default()
        .with_endpoint(&server.uri())
        .with_model("llama3.2");
    LlmClient::new(config).unwrap()
}

fn openai(server: &MockServer) -> LlmClient {
    let config = LlmConfig::base_default()
        .with_provider(LlmProvider::OpenAI)
        .with_endpoint(&server.uri())
        .with_model("gpt-4o")
        .with_api_key("test-key");
    LlmClient::new(config).unwrap()
}

fn score_request(review: &str) -> CompletionRequest {
    CompletionRequest {
        model: "llama3.2".to_string(),
        messages: vec![ChatMessage::user(format!("Score: {}", review))],
        temperature: 0.0,
        max_tokens: 16,
    }
}

#[tokio::test]
async fn ollama_chat_sends_options_and_reads_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "stream": false,
            "options": { "num_predict": 16 },
            "messages": [{ "role": "user", "content": "Score: great" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "message": { "role": "assistant", "content": " 0.9\n" },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = ollama(&server).complete(&score_request("great")).await.unwrap();
    assert_eq!(reply, " 0.9\n");
}

#[tokio::test]
async fn openai_responses_uses_bearer_and_first_output_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_output_tokens": 100
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "resp_1",
            "output": [
                { "type": "reasoning", "content": [] },
                {
                    "type": "message",
                    "role": "assistant",
                    "content": [{ "type": "output_text", "text": "Generative AI makes new content." }]
                }
            ]
        })))
        .mount(&server)
        .await;

    let reply = openai(&server)
        .ask("Explain generative AI in one sentence.")
        .await
        .unwrap();
    assert_eq!(reply, "Generative AI makes new content.");
}

#[tokio::test]
async fn http_error_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let err = ollama(&server)
        .complete(&score_request("great"))
        .await
        .unwrap_err();
    match err {
        LlmError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn rate_limit_maps_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = openai(&server).ask("hi").await.unwrap_err();
    assert!(matches!(err, LlmError::Api { status: 429, .. }));
}

#[tokio::test]
async fn slow_reply_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(json!({ "message": { "role": "assistant", "content": "0" } })),
        )
        .mount(&server)
        .await;

    let config = LlmConfig::base_default()
        .with_endpoint(&server.uri())
        .with_timeout_secs(1);
    let client = LlmClient::new(config).unwrap();
    let err = client.complete(&score_request("great")).await.unwrap_err();
    assert!(matches!(err, LlmError::Timeout(1)), "got {:?}", err);
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "output": [] })))
        .mount(&server)
        .await;

    let err = openai(&server).ask("hi").await.unwrap_err();
    assert!(matches!(err, LlmError::Parse(_)));
}

#[tokio::test]
async fn openai_without_key_fails_before_sending() {
    let server = MockServer::start().await;
    let config = LlmConfig::base_default()
        .with_provider(LlmProvider::OpenAI)
        .with_endpoint(&server.uri());
    let client = LlmClient::new(config).unwrap();

    let err = client.ask("hi").await.unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_models_for_each_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{ "name": "llama3.2" }, { "name": "mistral" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "gpt-4o" }]
        })))
        .mount(&server)
        .await;

    assert_eq!(
        ollama(&server).list_models().await.unwrap(),
        vec!["llama3.2", "mistral"]
    );
    assert_eq!(openai(&server).list_models().await.unwrap(), vec!["gpt-4o"]);
    assert!(ollama(&server).is_available().await);
}

#[tokio::test]
async fn unreachable_endpoint_is_unavailable() {
    let config = LlmConfig::base_default().with_endpoint("http://127.0.0.1:9");
    let client = LlmClient::new(config).unwrap();
    assert!(!client.is_available().await);
}
