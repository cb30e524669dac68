//! LLM client configuration.

use serde::{Deserialize, Serialize};

/// LLM provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Ollama API (local, default)
    #[default]
    Ollama,
    /// OpenAI-compatible Responses API (OpenAI, Groq, etc.)
    #[serde(alias = "groq")]
    OpenAI,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" => Some(Self::OpenAI),
            _ => None,
        }
    }
}

/// Configuration for the LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether LLM calls are enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// LLM provider (ollama or openai)
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint (provider-specific defaults apply)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key for OpenAI-compatible providers
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds. Calls are not retried.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_max_tokens() -> u32 {
    100
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

const OPENAI_ENDPOINT: &str = "https://api.openai.com";
const GROQ_ENDPOINT: &str = "https://api.groq.com/openai";
const OPENAI_MODEL: &str = "gpt-4o";

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: LlmProvider::default(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "ollama" (default), "openai" or "groq"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key for OpenAI-compatible providers
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_TEMPERATURE`: Generation temperature (0.0-1.0)
    /// - `LLM_TIMEOUT_SECS`: Request timeout
    ///
    /// Without `LLM_PROVIDER`, a set `OPENAI_API_KEY` switches to OpenAI.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `var`.
    pub fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        let explicit_provider = var("LLM_PROVIDER");
        let explicit_endpoint = var("LLM_ENDPOINT");
        let explicit_model = var("LLM_MODEL");

        if let Some(ref endpoint) = explicit_endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(val) = var("LLM_API_KEY") {
            self.api_key = Some(val);
        }

        if let Some(ref provider_str) = explicit_provider {
            if let Some(provider) = LlmProvider::from_str(provider_str) {
                let switching = provider != self.provider;
                self.provider = provider;
                if switching && explicit_endpoint.is_none() {
                    match provider_str.to_lowercase().as_str() {
                        "groq" => self.endpoint = GROQ_ENDPOINT.to_string(),
                        "openai" => self.endpoint = OPENAI_ENDPOINT.to_string(),
                        _ => self.endpoint = default_endpoint(),
                    }
                }
                if switching && explicit_model.is_none() && self.provider == LlmProvider::OpenAI {
                    self.model = OPENAI_MODEL.to_string();
                }
            }
            if self.api_key.is_none() {
                match provider_str.to_lowercase().as_str() {
                    "groq" => self.api_key = var("GROQ_API_KEY"),
                    "openai" => self.api_key = var("OPENAI_API_KEY"),
                    _ => {}
                }
            }
        } else if self.api_key.is_none() {
            if let Some(key) = var("OPENAI_API_KEY") {
                self.api_key = Some(key);
                self.provider = LlmProvider::OpenAI;
            }
        }

        // OpenAI selected (by file or key) but still pointed at local Ollama.
        if self.provider == LlmProvider::OpenAI && explicit_endpoint.is_none() {
            if self.endpoint == default_endpoint() {
                self.endpoint = OPENAI_ENDPOINT.to_string();
            }
            if explicit_model.is_none() && self.model == default_model() {
                self.model = OPENAI_MODEL.to_string();
            }
        }

        if let Some(model) = explicit_model {
            self.model = model;
        }
        if let Some(n) = var("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        if let Some(n) = var("LLM_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Request timeout; zero means the default rather than "expire at once".
    pub fn effective_timeout_secs(&self) -> u64 {
        if self.timeout_secs == 0 {
            default_timeout_secs()
        } else {
            self.timeout_secs
        }
    }

    /// Temperature clamped to the range providers accept.
    pub fn effective_temperature(&self) -> f32 {
        self.temperature.clamp(0.0, 1.0)
    }

    /// Get the provider name for display.
    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            LlmProvider::Ollama => "Ollama",
            LlmProvider::OpenAI => {
                if self.endpoint.contains("groq.com") {
                    "Groq"
                } else {
                    "OpenAI"
                }
            }
        }
    }

    /// Provider-aware hint for when the service cannot be reached.
    pub fn availability_hint(&self) -> String {
        match self.provider {
            LlmProvider::Ollama => format!(
                "Ollama not available at {}. Make sure Ollama is running: ollama serve",
                self.endpoint
            ),
            LlmProvider::OpenAI => {
                if self.api_key.is_none() {
                    "OpenAI API key not set. Set OPENAI_API_KEY or LLM_API_KEY".to_string()
                } else {
                    format!("{} API not available at {}", self.provider_name(), self.endpoint)
                }
            }
        }
    }
}
