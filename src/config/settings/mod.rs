
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const NVIDIA_API_KEY_VAR: &str = "NVIDIA_API_KEY";
pub const PINECONE_API_KEY_VAR: &str = "PINECONE_API_KEY";
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Settings for the hosted embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub dimension: u32,
    pub batch_size: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://integrate.api.nvidia.com".to_string(),
            model: "nvidia/nv-embedqa-mistral-7b-v2".to_string(),
            dimension: 4096,
            batch_size: 16,
        }
    }
}

/// Settings for the hosted vector index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    pub control_url: String,
    pub name: String,
    pub metric: String,
    pub cloud: String,
    pub region: String,
    pub ready_timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            control_url: "https://api.pinecone.io".to_string(),
            name: "ecommerce-catalog".to_string(),
            metric: "cosine".to_string(),
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
            ready_timeout_secs: 60,
        }
    }
}

/// Settings for the chat completion provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.6,
            max_tokens: 4096,
        }
    }
}

/// Per-turn retrieval settings for the chat pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub score_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            score_threshold: 0.7,
        }
    }
}

/// API keys for the three hosted collaborators. Sourced from the environment
/// at startup; a missing key is a fatal configuration error, never a
/// per-request one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub nvidia_api_key: String,
    pub pinecone_api_key: String,
    pub groq_api_key: String,
}

impl Credentials {
    #[inline]
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            nvidia_api_key: require_env(NVIDIA_API_KEY_VAR)?,
            pinecone_api_key: require_env(PINECONE_API_KEY_VAR)?,
            groq_api_key: require_env(GROQ_API_KEY_VAR)?,
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential(name.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid batch size: {0} (must be between 1 and 1000)")]
    InvalidBatchSize(u32),
    #[error("Invalid embedding dimension: {0} (must be between 64 and 8192)")]
    InvalidEmbeddingDimension(u32),
    #[error("Invalid index name: {0} (must be non-empty lowercase alphanumeric with hyphens)")]
    InvalidIndexName(String),
    #[error("Invalid similarity metric: {0} (must be 'cosine', 'dotproduct' or 'euclidean')")]
    InvalidMetric(String),
    #[error("Invalid readiness timeout: {0} (must be between 1 and 600 seconds)")]
    InvalidReadyTimeout(u64),
    #[error("Invalid temperature: {0} (must be between 0.0 and 2.0)")]
    InvalidTemperature(f32),
    #[error("Invalid max tokens: {0} (must be between 1 and 32768)")]
    InvalidMaxTokens(u32),
    #[error("Invalid top k: {0} (must be between 1 and 100)")]
    InvalidTopK(usize),
    #[error("Invalid score threshold: {0} (must be between 0.0 and 1.0)")]
    InvalidScoreThreshold(f32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Load settings from `config.toml` in the config directory, falling back
    /// to defaults when the file does not exist.
    #[inline]
    pub fn load() -> Result<Self> {
        let config_path = Self::config_dir()?.join("config.toml");
        Self::load_from(&config_path)
    }

    #[inline]
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config
            .validate()
            .context("Configuration validation failed")?;

        Ok(config)
    }

    /// Write the current settings to `config.toml` in the config directory.
    #[inline]
    pub fn save(&self) -> Result<PathBuf> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(config_path)
    }

    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("bazaar-chat"))
            .ok_or(ConfigError::DirectoryError)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.embedding.validate()?;
        self.index.validate()?;
        self.llm.validate()?;
        self.retrieval.validate()?;
        Ok(())
    }

    #[inline]
    pub fn embedding_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.embedding.base_url)
    }

    #[inline]
    pub fn index_control_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.index.control_url)
    }

    #[inline]
    pub fn llm_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.llm.base_url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))
}

impl EmbeddingConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_base_url(&self.base_url)?;
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }
        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }
        if self.dimension < 64 || self.dimension > 8192 {
            return Err(ConfigError::InvalidEmbeddingDimension(self.dimension));
        }
        Ok(())
    }
}

impl IndexConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_base_url(&self.control_url)?;
        if self.name.is_empty()
            || !self
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ConfigError::InvalidIndexName(self.name.clone()));
        }
        if !matches!(self.metric.as_str(), "cosine" | "dotproduct" | "euclidean") {
            return Err(ConfigError::InvalidMetric(self.metric.clone()));
        }
        if self.ready_timeout_secs == 0 || self.ready_timeout_secs > 600 {
            return Err(ConfigError::InvalidReadyTimeout(self.ready_timeout_secs));
        }
        Ok(())
    }
}

impl LlmConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_base_url(&self.base_url)?;
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        if self.max_tokens == 0 || self.max_tokens > 32768 {
            return Err(ConfigError::InvalidMaxTokens(self.max_tokens));
        }
        Ok(())
    }
}

impl RetrievalConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 || self.top_k > 100 {
            return Err(ConfigError::InvalidTopK(self.top_k));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(ConfigError::InvalidScoreThreshold(self.score_threshold));
        }
        Ok(())
    }
}
