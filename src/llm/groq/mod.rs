#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::config::{Config, LlmConfig};
use crate::llm::ChatModel;
use crate::net::RetryingAgent;
use crate::session::ChatTurn;
use crate::{ChatbotError, Result};

/// Client for Groq's OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct GroqClient {
    base_url: Url,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: String,
    agent: RetryingAgent,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<serde_json::Value>,
}

impl GroqClient {
    #[inline]
    pub fn new(config: &Config, api_key: &str) -> Result<Self> {
        let base_url = config.llm_url()?;
        Ok(Self::from_parts(base_url, &config.llm, api_key))
    }

    #[inline]
    pub fn from_parts(base_url: Url, llm: &LlmConfig, api_key: &str) -> Self {
        Self {
            base_url,
            model: llm.model.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            api_key: api_key.to_string(),
            agent: RetryingAgent::default(),
        }
    }

    #[inline]
    pub fn with_agent(mut self, agent: RetryingAgent) -> Self {
        self.agent = agent;
        self
    }

    fn build_messages(
        system_prompt: &str,
        history: &[ChatTurn],
        user_text: &str,
    ) -> Vec<serde_json::Value> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(json!({"role": "system", "content": system_prompt}));
        for turn in history {
            messages.push(json!({"role": turn.role.as_str(), "content": turn.text}));
        }
        messages.push(json!({"role": "user", "content": user_text}));
        messages
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_text: &str,
    ) -> Result<String> {
        let url = self
            .base_url
            .join("/openai/v1/chat/completions")
            .map_err(|e| {
                ChatbotError::Completion(format!("Failed to build completion URL: {e}"))
            })?;

        let request = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: Self::build_messages(system_prompt, history, user_text),
        };
        let request_json = serde_json::to_string(&request).map_err(|e| {
            ChatbotError::Completion(format!("Failed to serialize completion request: {e}"))
        })?;

        debug!(
            "Requesting completion from {} ({} history turns)",
            self.model,
            history.len()
        );

        let auth_header = format!("Bearer {}", self.api_key);
        let response_text = self
            .agent
            .post_json(&url, &[("Authorization", &auth_header)], &request_json)
            .map_err(|e| ChatbotError::Completion(format!("Completion request failed: {e}")))?;

        let mut response: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                ChatbotError::Completion(format!("Failed to parse completion response: {e}"))
            })?;

        if response.choices.is_empty() {
            return Err(ChatbotError::Completion(
                "Provider returned no choices".to_string(),
            ));
        }

        Ok(response.choices.remove(0).message.content)
    }
}
