// Session store
// Process-wide mapping from session id to conversation state. Sessions are
// created lazily, live for the process lifetime, and are never evicted or
// persisted. Each session sits behind its own mutex so concurrent turns on
// one id serialize without stalling unrelated sessions.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::policy::OrderLedger;

/// Who said a line of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    #[inline]
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// One end user's ongoing conversation: ordered history plus the order
/// ledger that scopes order ids and the stock fiction to this session.
#[derive(Debug)]
pub struct Session {
    session_id: String,
    history: Vec<ChatTurn>,
    pub orders: OrderLedger,
}

impl Session {
    #[inline]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            history: Vec::new(),
            orders: OrderLedger::new(),
        }
    }

    #[inline]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[inline]
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Append one turn. Only callers holding this session's lock reach
    /// this, so a user/assistant pair can never interleave with another
    /// turn's appends.
    #[inline]
    pub fn push_turn(&mut self, role: Role, text: impl Into<String>) {
        self.history.push(ChatTurn::new(role, text));
    }
}

/// Owner of every session. The orchestrator only ever holds a transient
/// `Arc` per turn; nothing else may mutate history.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a session, creating it on first reference. Creation is
    /// idempotent per id.
    #[inline]
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<Session>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(session_id) {
                return Arc::clone(session);
            }
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!("Creating session '{}'", session_id);
            Arc::new(Mutex::new(Session::new(session_id)))
        }))
    }

    #[inline]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Copy of a session's history, or `None` for an unknown id.
    #[inline]
    pub async fn history_snapshot(&self, session_id: &str) -> Option<Vec<ChatTurn>> {
        let session = {
            let sessions = self.sessions.read().await;
            sessions.get(session_id).cloned()
        }?;
        let guard = session.lock().await;
        Some(guard.history().to_vec())
    }
}
