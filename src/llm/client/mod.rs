//! LLM client for one-shot prompts and review scoring.
//!
//! Supports the Ollama chat API for local inference and the OpenAI
//! Responses API (or any compatible endpoint) for hosted models.

mod config;
mod prompts;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use config::{LlmConfig, LlmProvider};
pub use prompts::{DEFAULT_ASK_PROMPT, DEFAULT_SENTIMENT_PROMPT};

/// Role tag of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message of a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// Provider-neutral completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature in [0, 1].
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Something that turns a completion request into text.
///
/// `LlmClient` is the production implementation; tests substitute stubs.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to the LLM service
    #[error("Connection error: {0}")]
    Connection(String),
    /// No response within the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// API returned a non-success status
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// Hosted provider selected without credentials
    #[error("API key not set for {0}")]
    MissingApiKey(String),
    /// LLM is disabled
    #[error("LLM is disabled")]
    Disabled,
}

/// LLM client bound to one provider configuration.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// Ollama chat request format.
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama chat response format.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

/// OpenAI Responses API request format.
#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [ChatMessage],
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<ResponsesOutputItem>,
}

#[derive(Debug, Deserialize)]
struct ResponsesOutputItem {
    #[serde(default)]
    content: Vec<ResponsesContent>,
}

#[derive(Debug, Deserialize)]
struct ResponsesContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    /// First `output_text` fragment, mirroring `output[0].content[0].text`
    /// while skipping reasoning items that carry no text.
    fn first_text(self) -> Option<String> {
        self.output
            .into_iter()
            .flat_map(|item| item.content)
            .find(|c| c.kind == "output_text")
            .and_then(|c| c.text)
    }
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.effective_timeout_secs()))
            .build()
            .map_err(|e| LlmError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Check if the LLM service is reachable with the current credentials.
    pub async fn is_available(&self) -> bool {
        if !self.config.enabled {
            return false;
        }
        if self.config.provider == LlmProvider::OpenAI && self.config.api_key.is_none() {
            return false;
        }
        match self.authorized(self.client.get(self.models_url())).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List available models.
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        self.check_ready()?;
        let resp = self
            .authorized(self.client.get(self.models_url()))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }

        match self.config.provider {
            LlmProvider::Ollama => {
                #[derive(Deserialize)]
                struct TagsResponse {
                    models: Vec<ModelInfo>,
                }

                #[derive(Deserialize)]
                struct ModelInfo {
                    name: String,
                }

                let tags: TagsResponse = resp
                    .json()
                    .await
                    .map_err(|e| LlmError::Parse(e.to_string()))?;
                Ok(tags.models.into_iter().map(|m| m.name).collect())
            }
            LlmProvider::OpenAI => {
                #[derive(Deserialize)]
                struct ModelList {
                    data: Vec<ModelEntry>,
                }

                #[derive(Deserialize)]
                struct ModelEntry {
                    id: String,
                }

                let list: ModelList = resp
                    .json()
                    .await
                    .map_err(|e| LlmError::Parse(e.to_string()))?;
                Ok(list.data.into_iter().map(|m| m.id).collect())
            }
        }
    }

    /// Send a single user prompt with the configured generation settings.
    pub async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let request = self.request(vec![ChatMessage::user(prompt)], self.config.max_tokens);
        self.complete(&request).await
    }

    /// Build a request for the configured model.
    pub fn request(&self, messages: Vec<ChatMessage>, max_tokens: u32) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.effective_temperature(),
            max_tokens,
        }
    }

    fn check_ready(&self) -> Result<(), LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }
        if self.config.provider == LlmProvider::OpenAI && self.config.api_key.is_none() {
            return Err(LlmError::MissingApiKey(
                self.config.provider_name().to_string(),
            ));
        }
        Ok(())
    }

    fn models_url(&self) -> String {
        match self.config.provider {
            LlmProvider::Ollama => format!("{}/api/tags", self.config.endpoint),
            LlmProvider::OpenAI => format!("{}/v1/models", self.config.endpoint),
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.config.api_key {
            Some(ref key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.config.effective_timeout_secs())
        } else {
            LlmError::Connection(e.to_string())
        }
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, LlmError> {
        let resp = self
            .authorized(self.client.post(url))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, body });
        }
        Ok(resp)
    }

    /// Call the Ollama chat API.
    async fn call_ollama(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = OllamaChatRequest {
            model: &request.model,
            messages: &request.messages,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let url = format!("{}/api/chat", self.config.endpoint);
        let resp = self.send_json(&url, &body).await?;
        let chat: OllamaChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(chat.message.content)
    }

    /// Call the OpenAI Responses API.
    async fn call_openai(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ResponsesRequest {
            model: &request.model,
            input: &request.messages,
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        };

        let url = format!("{}/v1/responses", self.config.endpoint);
        let resp = self.send_json(&url, &body).await?;
        let parsed: ResponsesResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        parsed
            .first_text()
            .ok_or_else(|| LlmError::Parse("Response contained no output text".to_string()))
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.check_ready()?;
        debug!(
            "Calling {} model {} ({} messages, max_tokens {})",
            self.config.provider_name(),
            request.model,
            request.messages.len(),
            request.max_tokens
        );
        match self.config.provider {
            LlmProvider::Ollama => self.call_ollama(request).await,
            LlmProvider::OpenAI => self.call_openai(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_text_skips_items_without_text() {
        let parsed: ResponsesResponse = serde_json::from_value(serde_json::json!({
            "output": [
                {"type": "reasoning", "content": []},
                {"type": "message", "content": [
                    {"type": "output_text", "text": "0.8"}
                ]}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("0.8"));
    }

    #[test]
    fn responses_without_output_yield_none() {
        let parsed: ResponsesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.first_text().is_none());
    }

    #[test]
    fn chat_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be brief");
    }

    #[test]
    fn request_uses_configured_model_and_clamped_temperature() {
        let mut config = LlmConfig::base_default().with_model("tiny");
        config.temperature = 3.0;
        let client = LlmClient::new(config).unwrap();
        let request = client.request(vec![ChatMessage::user("hi")], 16);
        assert_eq!(request.model, "tiny");
        assert_eq!(request.temperature, 1.0);
        assert_eq!(request.max_tokens, 16);
    }

    #[tokio::test]
    async fn zero_timeout_does_not_expire_requests_at_once() {
        let config = LlmConfig::base_default()
            .with_endpoint("http://127.0.0.1:9")
            .with_timeout_secs(0);
        let client = LlmClient::new(config).unwrap();
        // Nothing listens on the discard port: the refusal must surface as a
        // connection error, not a zero-length timeout.
        assert!(matches!(
            client.ask("hello").await,
            Err(LlmError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn disabled_client_refuses_to_call() {
        let mut config = LlmConfig::base_default();
        config.enabled = false;
        let client = LlmClient::new(config).unwrap();
        assert!(matches!(client.ask("hello").await, Err(LlmError::Disabled)));
        assert!(!client.is_available().await);
    }

    #[tokio::test]
    async fn openai_without_key_is_rejected_before_sending() {
        let config = LlmConfig::base_default().with_provider(LlmProvider::OpenAI);
        let client = LlmClient::new(config).unwrap();
        assert!(matches!(
            client.ask("hello").await,
            Err(LlmError::MissingApiKey(_))
        ));
    }
}
