// Chat orchestrator
// Per-turn control flow: retrieve context, render the policy prompt, call
// the LLM, and append the turn to the session's history. The session lock
// is held for the whole turn, so turns on one session id serialize and a
// user/assistant pair can never interleave with another turn.


use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, error, info};

use crate::Result;
use crate::config::RetrievalConfig;
use crate::embeddings::EmbeddingProvider;
use crate::llm::ChatModel;
use crate::policy::{self, PriceRange, ProductRecord};
use crate::session::{Role, SessionStore};
use crate::vectordb::{ScoredDocument, VectorIndex};

pub struct ChatOrchestrator {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn ChatModel>,
    sessions: Arc<SessionStore>,
    top_k: usize,
    score_threshold: f32,
}

impl ChatOrchestrator {
    #[inline]
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        model: Arc<dyn ChatModel>,
        sessions: Arc<SessionStore>,
        retrieval: &RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            model,
            sessions,
            top_k: retrieval.top_k,
            score_threshold: retrieval.score_threshold,
        }
    }

    #[inline]
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Answer one user turn. Provider failures degrade to a fixed fallback
    /// reply and leave the session history untouched; a raw fault never
    /// reaches the transcript. On success, the user turn and the answer are
    /// appended together, in that order.
    #[inline]
    pub async fn respond(&self, session_id: &str, user_text: &str) -> Result<String> {
        let session = self.sessions.get_or_create(session_id).await;
        let mut session = session.lock().await;

        // Status questions about an order placed in this conversation get
        // the fixed tracking reply straight from the ledger, no model call.
        if let Some(order_id) = policy::find_order_id(user_text)
            && session.orders.knows_order(&order_id)
        {
            info!("Answering status of {} in session '{}'", order_id, session_id);
            let reply = policy::order_status_reply(&order_id);
            session.push_turn(Role::User, user_text);
            session.push_turn(Role::Assistant, reply.clone());
            return Ok(reply);
        }

        let context_docs = match self.retrieve(user_text).await {
            Ok(docs) => docs,
            Err(e) => {
                error!("Retrieval failed for session '{}': {e}", session_id);
                return Ok(policy::FALLBACK_REPLY.to_string());
            }
        };

        // Empty context means the catalog has nothing relevant; the fixed
        // out-of-catalog reply is deterministic, no model call needed.
        if context_docs.is_empty() {
            info!("No catalog context for turn in session '{}'", session_id);
            let reply = policy::OUT_OF_CATALOG_REPLY.to_string();
            session.push_turn(Role::User, user_text);
            session.push_turn(Role::Assistant, reply.clone());
            return Ok(reply);
        }

        let context = context_docs.iter().map(|doc| doc.text.as_str()).join("\n\n");
        let prompt = policy::system_prompt(&context);

        let answer = match self
            .model
            .complete(&prompt, session.history(), user_text)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                error!("Completion failed for session '{}': {e}", session_id);
                return Ok(policy::FALLBACK_REPLY.to_string());
            }
        };

        // Order ids are assigned here, not by the model: the reply carries a
        // pending marker that is swapped for the session's next real id.
        let answer = session.orders.fill_pending_order_id(&answer);

        session.push_turn(Role::User, user_text);
        session.push_turn(Role::Assistant, answer.clone());

        Ok(answer)
    }

    /// Embed the user text and fetch catalog context above the similarity
    /// threshold. When the text states a price window, products outside the
    /// window are removed before the model ever sees them; everything that
    /// qualifies stays in.
    async fn retrieve(&self, user_text: &str) -> Result<Vec<ScoredDocument>> {
        let query_vector = self.embedder.embed_query(user_text).await?;
        let docs = self
            .index
            .query(&query_vector, self.top_k, self.score_threshold)
            .await?;

        debug!("Retrieved {} context documents", docs.len());

        let Some(range) = PriceRange::parse(user_text) else {
            return Ok(docs);
        };

        let filtered: Vec<ScoredDocument> = docs
            .into_iter()
            .filter(|doc| match ProductRecord::parse(&doc.text) {
                Some(product) => range.contains(product.price),
                // Context that is not a catalog row is kept as-is.
                None => true,
            })
            .collect();

        debug!(
            "{} context documents remain after price filter {:?}",
            filtered.len(),
            range
        );
        Ok(filtered)
    }
}
