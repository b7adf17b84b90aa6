//! Per-user conversational state.

pub mod store;

pub use store::{SessionStore, SharedSession};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ConversationHandle, HistoryMessage, Role};

/// State of one session key: remote conversation handle plus rolling history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: String,
    conversation_handle: Option<ConversationHandle>,
    messages: Vec<HistoryMessage>,
    total_tokens: u64,
    system_prompt: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, system_prompt: Option<String>) -> Self {
        let now = Utc::now();
        let mut session = Self {
            id: id.into(),
            conversation_handle: None,
            messages: Vec::new(),
            total_tokens: 0,
            system_prompt,
            created_at: now,
            updated_at: now,
        };
        session.seed_system_prompt();
        session
    }

    fn seed_system_prompt(&mut self) {
        if let Some(prompt) = self.system_prompt.as_ref().filter(|p| !p.is_empty()) {
            self.messages.push(HistoryMessage::system(prompt.clone()));
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn conversation_handle(&self) -> Option<&ConversationHandle> {
        self.conversation_handle.as_ref()
    }

    /// Store the handle issued by the remote service.
    ///
    /// A handle already present is kept; the first one issued wins until
    /// [`clear`](Self::clear).
    pub fn set_conversation_handle(&mut self, handle: ConversationHandle) -> &ConversationHandle {
        self.updated_at = Utc::now();
        self.conversation_handle.get_or_insert(handle)
    }

    pub fn messages(&self) -> &[HistoryMessage] {
        &self.messages
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Most recent user message, the one submitted to the remote agent.
    pub fn latest_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }

    /// Append the user's query, then trim to `max_tokens`.
    pub fn add_query(&mut self, query: impl Into<String>, max_tokens: usize) {
        self.messages.push(HistoryMessage::user(query));
        self.updated_at = Utc::now();
        self.discard_exceeding(max_tokens);
    }

    /// Append the agent's reply, count its tokens, then trim to `max_tokens`.
    pub fn append_assistant_reply(
        &mut self,
        reply: impl Into<String>,
        token_delta: u64,
        max_tokens: usize,
    ) {
        self.messages.push(HistoryMessage::assistant(reply));
        self.total_tokens = self.total_tokens.saturating_add(token_delta);
        self.updated_at = Utc::now();
        self.discard_exceeding(max_tokens);
    }

    /// Reset handle, history and counter in one step. The system prompt is
    /// re-seeded.
    pub fn clear(&mut self) {
        self.conversation_handle = None;
        self.messages.clear();
        self.total_tokens = 0;
        self.updated_at = Utc::now();
        self.seed_system_prompt();
    }

    /// Rough token estimate: two tokens per character of history.
    pub fn estimated_tokens(&self) -> usize {
        self.messages
            .iter()
            .map(|m| m.content.chars().count() * 2)
            .sum()
    }

    /// Drop the oldest non-system messages until the estimate fits.
    ///
    /// The newest message is always kept, even if it alone exceeds the limit.
    pub fn discard_exceeding(&mut self, max_tokens: usize) -> usize {
        let mut tokens = self.estimated_tokens();
        while tokens > max_tokens {
            let removable = self
                .messages
                .iter()
                .position(|m| m.role != Role::System)
                .filter(|idx| idx + 1 < self.messages.len());
            let Some(idx) = removable else { break };
            let removed = self.messages.remove(idx);
            tokens -= removed.content.chars().count() * 2;
        }
        tokens
    }
}
