//! Configuration management for reviewlens using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::dataset::SampleSize;
use crate::llm::LlmConfig;
use crate::services::annotation::SentimentConfig;

/// Name used for config file discovery (`reviewlens.json`, `.toml`, ...).
pub const CONFIG_NAME: &str = "reviewlens";

/// Default dataset location, relative to the config directory or CWD.
pub const DEFAULT_DATASET_PATH: &str = "data/customer_reviews.csv";

/// Dataset loading settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the reviews CSV
    #[serde(default = "default_dataset_path")]
    pub path: String,
    /// Field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Default number of reviews to sample for scoring
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

fn default_dataset_path() -> String {
    DEFAULT_DATASET_PATH.to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_sample_size() -> usize {
    5
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            delimiter: default_delimiter(),
            sample_size: default_sample_size(),
        }
    }
}

impl DatasetConfig {
    /// Delimiter as the single byte the CSV reader wants.
    /// Non-ASCII delimiters fall back to a comma.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            warn!("Ignoring non-ASCII delimiter {:?}", self.delimiter);
            b','
        }
    }

    /// Configured sample size, or the minimum when the config is out of range.
    pub fn sample_size(&self) -> SampleSize {
        SampleSize::new(self.sample_size).unwrap_or_else(|e| {
            warn!("{}; using {}", e, SampleSize::MIN);
            SampleSize::MIN
        })
    }
}

/// Dashboard server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset location and sampling.
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// LLM configuration for one-shot prompts and scoring.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Sentiment scorer settings.
    #[serde(default, skip_serializing_if = "SentimentConfig::is_default")]
    pub sentiment: SentimentConfig,
    /// Dashboard server.
    #[serde(default)]
    pub server: ServerConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults with env overrides when no file is found.
    pub async fn load() -> Self {
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        warn!("{}; using defaults", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, String> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config: Config = match ext {
            "toml" => toml::from_str(contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };
        // File values are the base; env still wins.
        config.llm = config.llm.with_env_overrides();
        Ok(config)
    }

    /// Directory relative paths resolve against: the config file's
    /// directory, else the current directory.
    pub fn base_dir(&self) -> PathBuf {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are joined onto `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Dataset path, honoring an explicit override.
    pub fn dataset_path(&self, override_path: Option<&str>) -> PathBuf {
        let raw = override_path.unwrap_or(&self.dataset.path);
        self.resolve_path(raw, &self.base_dir())
    }

    /// Compute a hash of the config for change detection.
    pub fn hash(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        hex::encode(hasher.finalize())
    }
}
