//! Externally visible classification of a turn.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Reply handed to the chat surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum ReplyOutcome {
    Text(String),
    Error(String),
    ImageUrl(String),
    VideoUrl(String),
    Info(String),
}

/// Discriminant of [`ReplyOutcome`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReplyKind {
    Text,
    Error,
    ImageUrl,
    VideoUrl,
    Info,
}

impl ReplyOutcome {
    pub fn kind(&self) -> ReplyKind {
        match self {
            Self::Text(_) => ReplyKind::Text,
            Self::Error(_) => ReplyKind::Error,
            Self::ImageUrl(_) => ReplyKind::ImageUrl,
            Self::VideoUrl(_) => ReplyKind::VideoUrl,
            Self::Info(_) => ReplyKind::Info,
        }
    }

    /// The text or URL carried by the reply.
    pub fn payload(&self) -> &str {
        match self {
            Self::Text(s)
            | Self::Error(s)
            | Self::ImageUrl(s)
            | Self::VideoUrl(s)
            | Self::Info(s) => s,
        }
    }
}
