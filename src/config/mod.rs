// Configuration management module
// TOML settings for the hosted providers plus environment-sourced credentials

pub mod settings;

#[cfg(test)]
mod tests;

pub use settings::{
    Config, ConfigError, Credentials, EmbeddingConfig, IndexConfig, LlmConfig, RetrievalConfig,
};

/// Get the configuration directory path
#[inline]
pub fn get_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    Config::config_dir()
}
