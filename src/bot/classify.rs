//! Maps a turn's terminal text onto a reply kind.

use serde_json::Value;
use tracing::{debug, info};

use crate::types::ConversationTurnResult;

const VIDEO_SUCCESS_MARKER: &str = "SUCCESS";
const VIDEO_EXTENSION: &str = ".mp4";
const IMAGE_EXTENSION: &str = ".png";

/// Classification of a terminal result, before session bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Video(String),
    Image(String),
    /// Text came back but the remote reported no completion.
    Rejected(String),
    /// A real completion; recorded in history.
    Completed { text: String, total_tokens: u32 },
    /// Empty text and no completion.
    Unknown,
}

type Rule = fn(&ReplyClassifier, &ConversationTurnResult) -> Option<Classified>;

/// Ordered classification rules; the first match wins.
#[derive(Debug, Clone)]
pub struct ReplyClassifier {
    media_host: String,
}

impl ReplyClassifier {
    const RULES: [Rule; 4] = [
        Self::video_link,
        Self::image_link,
        Self::rejected,
        Self::completed,
    ];

    pub fn new(media_host: impl Into<String>) -> Self {
        Self {
            media_host: media_host.into(),
        }
    }

    pub fn classify(&self, result: &ConversationTurnResult) -> Classified {
        Self::RULES
            .iter()
            .find_map(|rule| rule(self, result))
            .unwrap_or(Classified::Unknown)
    }

    /// `["SUCCESS", [{"url": "....mp4", ...}]]`
    fn video_link(&self, result: &ConversationTurnResult) -> Option<Classified> {
        let text = result.text.trim();
        if !text.starts_with('[') || !text.contains(VIDEO_SUCCESS_MARKER) {
            return None;
        }
        let parsed: Vec<Value> = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "Reply is not a video list");
                return None;
            }
        };
        if parsed.first().and_then(Value::as_str) != Some(VIDEO_SUCCESS_MARKER) {
            return None;
        }
        let url = parsed
            .get(1)?
            .as_array()?
            .first()?
            .get("url")?
            .as_str()
            .filter(|u| u.ends_with(VIDEO_EXTENSION))?;
        info!(%url, "Found video url");
        Some(Classified::Video(url.to_string()))
    }

    fn image_link(&self, result: &ConversationTurnResult) -> Option<Classified> {
        let text = &result.text;
        if self.media_host.is_empty()
            || !text.starts_with(&self.media_host)
            || !text.ends_with(IMAGE_EXTENSION)
        {
            return None;
        }
        info!(url = %text, "Found image url");
        Some(Classified::Image(text.clone()))
    }

    fn rejected(&self, result: &ConversationTurnResult) -> Option<Classified> {
        (result.completion_tokens() == 0 && !result.text.is_empty())
            .then(|| Classified::Rejected(result.text.clone()))
    }

    fn completed(&self, result: &ConversationTurnResult) -> Option<Classified> {
        (result.completion_tokens() > 0).then(|| Classified::Completed {
            text: result.text.clone(),
            total_tokens: result.total_tokens(),
        })
    }
}
