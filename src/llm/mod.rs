//! LLM integration for review annotation.
//!
//! Talks to a local model (via Ollama) or a hosted OpenAI-compatible API.

mod client;

pub use client::{
    ChatMessage, ChatRole, CompletionRequest, CompletionService, LlmClient, LlmConfig, LlmError,
    LlmProvider, DEFAULT_ASK_PROMPT, DEFAULT_SENTIMENT_PROMPT,
};
