use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatbotError>;

#[derive(Error, Debug)]
pub enum ChatbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    VectorDb(String),

    #[error("Index '{0}' not ready after {1:?}")]
    IndexNotReady(String, Duration),

    #[error("Upsert error: {0}")]
    Upsert(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<crate::config::ConfigError> for ChatbotError {
    fn from(err: crate::config::ConfigError) -> Self {
        ChatbotError::Config(err.to_string())
    }
}

pub mod chat;
pub mod commands;
pub mod config;
pub mod embeddings;
pub mod ingestion;
pub mod llm;
pub mod net;
pub mod pipeline;
pub mod policy;
pub mod session;
pub mod vectordb;
