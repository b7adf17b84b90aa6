//! Terminal result of one conversation turn.

use serde::{Deserialize, Serialize};

use super::usage::Usage;

/// What the lifecycle controller hands back to the orchestrator.
///
/// Immutable once built. `usage` is absent when the stream never carried a
/// usage event; in that case [`completion_tokens`](Self::completion_tokens)
/// reports 1 so a content-bearing reply still counts as a real completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurnResult {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    pub is_final: bool,
}

impl ConversationTurnResult {
    /// A result produced by the stream decoder.
    pub fn new(text: impl Into<String>, usage: Option<Usage>) -> Self {
        Self {
            text: text.into(),
            usage,
            is_final: true,
        }
    }

    /// A fallback result with zero usage: the model produced nothing.
    pub fn without_completion(text: impl Into<String>) -> Self {
        Self::new(text, Some(Usage::zero()))
    }

    pub fn completion_tokens(&self) -> u32 {
        self.usage.map_or(1, |u| u.completion_tokens)
    }

    pub fn total_tokens(&self) -> u32 {
        self.usage.map_or(0, |u| u.total_tokens)
    }
}
