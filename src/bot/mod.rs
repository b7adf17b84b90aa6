//! Turn orchestrator: commands, session locking, reply classification.

pub mod classify;

pub use classify::{Classified, ReplyClassifier};

use std::sync::Arc;

use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::config::{CommandSection, RelayConfig, ReplyTexts};
use crate::error::Result;
use crate::lifecycle::ConversationController;
use crate::provider::{AgentTransport, ZhipuAgentProvider};
use crate::session::SessionStore;
use crate::types::{ContextKind, ReplyOutcome, TurnContext};

/// Entry point: one user message in, one [`ReplyOutcome`] out.
pub struct AgentBot {
    controller: ConversationController,
    sessions: SessionStore,
    commands: CommandSection,
    replies: ReplyTexts,
    classifier: ReplyClassifier,
}

impl AgentBot {
    /// Build a bot over an explicit transport.
    pub fn new(transport: Arc<dyn AgentTransport>, config: &RelayConfig) -> Self {
        Self {
            controller: ConversationController::new(transport, config),
            sessions: SessionStore::new(config.session.clone()),
            commands: config.commands.clone(),
            replies: config.replies.clone(),
            classifier: ReplyClassifier::new(config.media_host.clone()),
        }
    }

    /// Validate the config and build a bot over the Zhipu HTTP transport.
    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(ZhipuAgentProvider::new(config)?);
        Ok(Self::new(transport, config))
    }

    /// Replace the lifecycle controller (retry policy, decoder deadlines).
    pub fn with_controller(mut self, controller: ConversationController) -> Self {
        self.controller = controller;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one inbound message.
    pub async fn reply(&self, context: &TurnContext) -> ReplyOutcome {
        let span = tracing::info_span!(
            "reply",
            turn_id = %Uuid::new_v4(),
            session = %context.session_key,
        );
        self.reply_inner(context).instrument(span).await
    }

    async fn reply_inner(&self, context: &TurnContext) -> ReplyOutcome {
        if context.kind != ContextKind::Text {
            return ReplyOutcome::Error(self.replies.unsupported(context.kind));
        }

        let query = context.content.as_str();
        info!(query, "Received query");

        if let Some(reply) = self.handle_commands(query, &context.session_key).await {
            return reply;
        }

        let max_tokens = self.sessions.settings().conversation_max_tokens;
        let session = self.sessions.get_or_create(&context.session_key);
        let mut session = session.lock().await;
        session.add_query(query, max_tokens);

        let report = self.controller.run_turn(&mut session, query).await;
        debug!(attempts = report.attempts, "Turn finished");

        match self.classifier.classify(&report.result) {
            Classified::Video(url) => ReplyOutcome::VideoUrl(url),
            Classified::Image(url) => ReplyOutcome::ImageUrl(url),
            Classified::Rejected(text) => ReplyOutcome::Error(text),
            Classified::Completed { text, total_tokens } => {
                session.append_assistant_reply(text.clone(), u64::from(total_tokens), max_tokens);
                ReplyOutcome::Text(text)
            }
            Classified::Unknown => {
                debug!(result = ?report.result, "Reply used 0 tokens");
                ReplyOutcome::Error(self.replies.unknown_error.clone())
            }
        }
    }

    async fn handle_commands(&self, query: &str, session_key: &str) -> Option<ReplyOutcome> {
        if self.commands.is_clear_memory(query) {
            self.sessions.clear(session_key).await;
            info!(session = session_key, "Session memory cleared");
            return Some(ReplyOutcome::Info(self.replies.memory_cleared.clone()));
        }
        if self.commands.is_clear_all(query) {
            self.sessions.clear_all();
            info!("All session memory cleared");
            return Some(ReplyOutcome::Info(self.replies.all_memory_cleared.clone()));
        }
        None
    }
}
