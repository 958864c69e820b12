
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::{Config, EmbeddingConfig};
use crate::embeddings::EmbeddingProvider;
use crate::net::RetryingAgent;
use crate::{ChatbotError, Result};

/// Queries and passages are embedded with different input types so the
/// provider applies the right instruction tuning to each side.
const QUERY_INPUT_TYPE: &str = "query";
const PASSAGE_INPUT_TYPE: &str = "passage";

/// Client for the NVIDIA NIM embeddings endpoint (OpenAI-compatible
/// `/v1/embeddings` with NIM's `input_type`/`truncate` extensions).
#[derive(Debug, Clone)]
pub struct NvidiaClient {
    base_url: Url,
    model: String,
    dimension: usize,
    batch_size: usize,
    api_key: String,
    agent: RetryingAgent,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    input_type: &'a str,
    truncate: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl NvidiaClient {
    #[inline]
    pub fn new(config: &Config, api_key: &str) -> Result<Self> {
        let base_url = config.embedding_url()?;
        Ok(Self::from_parts(base_url, &config.embedding, api_key))
    }

    #[inline]
    pub fn from_parts(base_url: Url, embedding: &EmbeddingConfig, api_key: &str) -> Self {
        Self {
            base_url,
            model: embedding.model.clone(),
            dimension: embedding.dimension as usize,
            batch_size: embedding.batch_size as usize,
            api_key: api_key.to_string(),
            agent: RetryingAgent::default(),
        }
    }

    #[inline]
    pub fn with_agent(mut self, agent: RetryingAgent) -> Self {
        self.agent = agent;
        self
    }

    fn embed_texts(&self, texts: &[String], input_type: &str) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Generating embeddings for {} texts (input_type={})",
            texts.len(),
            input_type
        );

        let mut results = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size.max(1)) {
            results.extend(self.embed_single_batch(batch, input_type)?);
        }

        debug!("Generated {} embeddings total", results.len());
        Ok(results)
    }

    fn embed_single_batch(&self, texts: &[String], input_type: &str) -> Result<Vec<Vec<f32>>> {
        let url = self.base_url.join("/v1/embeddings").map_err(|e| {
            ChatbotError::Embedding(format!("Failed to build embeddings URL: {e}"))
        })?;

        let request = EmbedRequest {
            model: &self.model,
            input: texts,
            input_type,
            truncate: "NONE",
        };
        let request_json = serde_json::to_string(&request).map_err(|e| {
            ChatbotError::Embedding(format!("Failed to serialize embedding request: {e}"))
        })?;

        let auth_header = format!("Bearer {}", self.api_key);
        let response_text = self
            .agent
            .post_json(&url, &[("Authorization", &auth_header)], &request_json)
            .map_err(|e| {
                ChatbotError::Embedding(format!(
                    "Embedding request for batch of {} texts failed: {e}",
                    texts.len()
                ))
            })?;

        let mut response: EmbedResponse = serde_json::from_str(&response_text).map_err(|e| {
            ChatbotError::Embedding(format!("Failed to parse embedding response: {e}"))
        })?;

        if response.data.len() != texts.len() {
            return Err(ChatbotError::Embedding(format!(
                "Mismatch between request and response counts: {} vs {}",
                texts.len(),
                response.data.len()
            )));
        }

        // The provider may return entries out of order; index is authoritative.
        response.data.sort_by_key(|entry| entry.index);
        Ok(response.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for NvidiaClient {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let texts = [text.to_string()];
        let mut embeddings = self.embed_texts(&texts, QUERY_INPUT_TYPE)?;
        embeddings
            .pop()
            .ok_or_else(|| ChatbotError::Embedding("Provider returned no embedding".to_string()))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_texts(texts, PASSAGE_INPUT_TYPE)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
