//! Nested configuration sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::retry::RetryPolicy;

/// `[retry]`: Turn-level retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    pub backoff_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            backoff_ms: policy.backoff.as_millis() as u64,
        }
    }
}

impl RetrySection {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

/// `[commands]`: Chat commands handled locally, without a network call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSection {
    /// Exact strings that reset the sender's own session.
    pub clear_memory_commands: Vec<String>,
    /// Exact string that resets every session.
    pub clear_all_command: String,
}

impl Default for CommandSection {
    fn default() -> Self {
        Self {
            clear_memory_commands: vec!["#清除记忆".to_string()],
            clear_all_command: "#清除所有".to_string(),
        }
    }
}

impl CommandSection {
    pub fn is_clear_memory(&self, query: &str) -> bool {
        self.clear_memory_commands.iter().any(|c| c == query)
    }

    pub fn is_clear_all(&self, query: &str) -> bool {
        self.clear_all_command == query
    }
}

/// `[session]`: Local session bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub system_prompt: Option<String>,
    /// Estimated-token ceiling for the rolling history.
    pub conversation_max_tokens: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            system_prompt: None,
            conversation_max_tokens: 1000,
        }
    }
}

/// `[replies]`: Fixed fallback and notice texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyTexts {
    /// Stream closed without any content.
    pub no_content: String,
    /// Stream could not be opened or read.
    pub transport_failure: String,
    /// Every attempt of the turn failed.
    pub exhausted: String,
    /// Empty text and zero tokens.
    pub unknown_error: String,
    pub memory_cleared: String,
    pub all_memory_cleared: String,
    /// `{}` is replaced with the context kind.
    pub unsupported_kind: String,
}

impl Default for ReplyTexts {
    fn default() -> Self {
        Self {
            no_content: "对不起，我没有收到有效的回复".to_string(),
            transport_failure: "对不起，发生了未知错误".to_string(),
            exhausted: "我现在有点累了，等会再来吧".to_string(),
            unknown_error: "未知错误".to_string(),
            memory_cleared: "记忆已清除".to_string(),
            all_memory_cleared: "所有人记忆已清除".to_string(),
            unsupported_kind: "Bot不支持处理{}类型的消息".to_string(),
        }
    }
}

impl ReplyTexts {
    pub fn unsupported(&self, kind: impl std::fmt::Display) -> String {
        self.unsupported_kind.replacen("{}", &kind.to_string(), 1)
    }
}
