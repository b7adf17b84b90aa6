//! In-memory session store keyed by session id.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use crate::config::SessionSection;

use super::Session;

/// A session guarded for the duration of a turn.
///
/// Holding the lock serializes turns of the same session; different sessions
/// proceed independently.
pub type SharedSession = Arc<Mutex<Session>>;

/// Manages sessions by key.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SharedSession>>,
    settings: SessionSection,
}

impl SessionStore {
    pub fn new(settings: SessionSection) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            settings,
        }
    }

    pub fn settings(&self) -> &SessionSection {
        &self.settings
    }

    /// Get or create a session by key.
    pub fn get_or_create(&self, key: &str) -> SharedSession {
        if let Some(existing) = self.get(key) {
            return existing;
        }
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(key.to_string())
            .or_insert_with(|| {
                tracing::info!(session = key, "Created session");
                Arc::new(Mutex::new(Session::new(
                    key,
                    self.settings.system_prompt.clone(),
                )))
            })
            .clone()
    }

    /// Get an existing session.
    pub fn get(&self, key: &str) -> Option<SharedSession> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Reset one session. Waits for an in-flight turn of that session.
    pub async fn clear(&self, key: &str) {
        if let Some(session) = self.get(key) {
            session.lock().await.clear();
        }
    }

    /// Drop every session. Turns already running finish on their own copy.
    pub fn clear_all(&self) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Record an assistant reply and its token cost on a session.
    pub async fn append_assistant_reply(&self, key: &str, text: &str, token_delta: u64) {
        let session = self.get_or_create(key);
        session.lock().await.append_assistant_reply(
            text,
            token_delta,
            self.settings.conversation_max_tokens,
        );
    }

    /// List session keys.
    pub fn session_keys(&self) -> Vec<String> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
