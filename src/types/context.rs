//! Inbound turn context.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of inbound message. Only text is relayed to the remote agent.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextKind {
    #[default]
    Text,
    Image,
    Voice,
    File,
    Video,
}

/// One inbound user message plus the key of the session it belongs to.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct TurnContext {
    #[builder(into)]
    pub session_key: String,
    #[builder(into)]
    pub content: String,
    #[builder(default)]
    pub kind: ContextKind,
}

impl TurnContext {
    /// Shorthand for a text message.
    pub fn text(session_key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            content: content.into(),
            kind: ContextKind::Text,
        }
    }
}
