//! LLM sentiment scoring, memoized by review text.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dataset::{Value, SENTIMENT_COLUMN, SUMMARY_COLUMN};
use crate::llm::{
    ChatMessage, CompletionRequest, CompletionService, LlmClient, LlmConfig,
    DEFAULT_SENTIMENT_PROMPT,
};

use super::annotator::RowAnnotator;
use super::cache::{CacheStats, EvictionPolicy, MemoCache};
use super::types::AnnotationError;

/// Settings for the sentiment scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Custom scoring prompt (uses the `{review}` placeholder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Completion budget for the numeric reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature; falls back to the LLM config when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum memoized reviews (unset = unbounded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,
}

fn default_max_tokens() -> u32 {
    16
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            prompt: None,
            max_tokens: default_max_tokens(),
            temperature: None,
            cache_capacity: None,
        }
    }
}

impl SentimentConfig {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Get the scoring prompt, using custom or default.
    pub fn get_prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(DEFAULT_SENTIMENT_PROMPT)
    }
}

/// Parse a model reply as a score. Surrounding whitespace is ignored;
/// anything else that is not a finite float is an error.
pub fn parse_score(reply: &str) -> Result<f64, AnnotationError> {
    match reply.trim().parse::<f64>() {
        Ok(score) if score.is_finite() => Ok(score),
        _ => Err(AnnotationError::Parse {
            reply: reply.to_string(),
        }),
    }
}

/// Annotator that asks an LLM for a sentiment score in [-1, 1].
pub struct SentimentScorer {
    service: Arc<dyn CompletionService>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    prompt: String,
    cache: MemoCache<String, f64>,
    availability: Option<Arc<LlmClient>>,
}

impl SentimentScorer {
    /// Build a scorer over any completion service.
    pub fn new(
        service: Arc<dyn CompletionService>,
        llm: &LlmConfig,
        config: &SentimentConfig,
    ) -> Self {
        Self {
            service,
            model: llm.model.clone(),
            temperature: config
                .temperature
                .map(|t| t.clamp(0.0, 1.0))
                .unwrap_or_else(|| llm.effective_temperature()),
            max_tokens: config.max_tokens,
            prompt: config.get_prompt().to_string(),
            cache: MemoCache::new(EvictionPolicy::from_capacity(config.cache_capacity)),
            availability: None,
        }
    }

    /// Build a scorer backed by a real client, which also answers
    /// availability checks.
    pub fn from_client(client: Arc<LlmClient>, config: &SentimentConfig) -> Self {
        let llm = client.config().clone();
        let mut scorer = Self::new(client.clone(), &llm, config);
        scorer.availability = Some(client);
        scorer
    }

    /// Prompt sent for one review.
    pub fn render_prompt(&self, review: &str) -> String {
        if self.prompt.contains("{review}") {
            self.prompt.replace("{review}", review)
        } else {
            format!("{} {}", self.prompt, review)
        }
    }

    /// Score one review, consulting the memo table first.
    pub async fn score(&self, review: &str) -> Result<f64, AnnotationError> {
        if let Some(score) = self.cache.get(review) {
            debug!("Sentiment cache hit ({} chars)", review.len());
            return Ok(score);
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(self.render_prompt(review))],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let reply = self.service.complete(&request).await?;
        let score = parse_score(&reply)?;
        if !(-1.0..=1.0).contains(&score) {
            warn!("Model returned out-of-range sentiment {}", score);
        }

        self.cache.insert(review.to_string(), score);
        Ok(score)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[async_trait]
impl RowAnnotator for SentimentScorer {
    fn source_column(&self) -> &str {
        SUMMARY_COLUMN
    }

    fn target_column(&self) -> &str {
        SENTIMENT_COLUMN
    }

    fn display_name(&self) -> &str {
        "Sentiment analysis"
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn is_available(&self) -> bool {
        match self.availability {
            Some(ref client) => client.is_available().await,
            None => true,
        }
    }

    fn availability_hint(&self) -> String {
        self.availability
            .as_ref()
            .map(|c| c.config().availability_hint())
            .unwrap_or_default()
    }

    async fn annotate(&self, text: &str) -> Result<Value, AnnotationError> {
        self.score(text).await.map(Value::Number)
    }
}
