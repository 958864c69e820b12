// LLM module
// Trait seam for the chat completion provider plus the Groq client

pub mod groq;

pub use groq::GroqClient;

use async_trait::async_trait;

use crate::Result;
use crate::session::ChatTurn;

/// Opaque chat completion function: system prompt + conversation history +
/// the current user message in, one answer out. Responses are batched, not
/// streamed.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_text: &str,
    ) -> Result<String>;
}
