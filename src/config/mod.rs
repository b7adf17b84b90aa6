//! Configuration system (layered: defaults > TOML file > env).

pub mod sections;

pub use sections::{CommandSection, ReplyTexts, RetrySection, SessionSection};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/llm-application/open";
pub const DEFAULT_MEDIA_HOST: &str = "https://aigc-files.bigmodel.cn";

/// Layered configuration for the relay.
///
/// Resolution order, later wins:
/// 1. Built-in defaults
/// 2. TOML file (`~/.agent-relay/config.toml` unless a path is given)
/// 3. Environment (`ZHIPU_AI_API_KEY`, `ZHIPU_AGENT_APP_ID`, `ZHIPU_AGENT_BASE_URL`,
///    with `.env` loaded first)
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub api_key: String,
    pub app_id: String,
    pub base_url: String,
    /// Label of the `user` input slot in the agent application.
    pub input_label: String,
    /// Prefix identifying generated images hosted by the remote service.
    pub media_host: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Deadline for opening the event stream and for each read on it.
    pub stream_read_timeout_secs: u64,
    pub retry: RetrySection,
    pub commands: CommandSection,
    pub session: SessionSection,
    pub replies: ReplyTexts,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { ".." })
            .field("app_id", &self.app_id)
            .field("base_url", &self.base_url)
            .field("input_label", &self.input_label)
            .field("media_host", &self.media_host)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("stream_read_timeout_secs", &self.stream_read_timeout_secs)
            .field("retry", &self.retry)
            .field("commands", &self.commands)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            app_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            input_label: "用户提问".to_string(),
            media_host: DEFAULT_MEDIA_HOST.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            stream_read_timeout_secs: 180,
            retry: RetrySection::default(),
            commands: CommandSection::default(),
            session: SessionSection::default(),
            replies: ReplyTexts::default(),
        }
    }
}

impl RelayConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| RelayError::Configuration(e.to_string()))
    }

    /// Read a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Defaults overlaid with environment variables only.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Full layered load.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let mappings: [(&str, &mut String); 3] = [
            ("ZHIPU_AI_API_KEY", &mut self.api_key),
            ("ZHIPU_AGENT_APP_ID", &mut self.app_id),
            ("ZHIPU_AGENT_BASE_URL", &mut self.base_url),
        ];
        for (var, slot) in mappings {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }
    }

    /// Reject configurations that cannot reach the remote service.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(RelayError::Configuration("Missing ZHIPU_AI_API_KEY".into()));
        }
        if self.app_id.trim().is_empty() {
            return Err(RelayError::Configuration("Missing ZHIPU_AGENT_APP_ID".into()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(RelayError::Configuration(format!(
                "Invalid base_url: '{}'",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn stream_read_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_read_timeout_secs)
    }
}

/// `~/.agent-relay/config.toml`, or a relative fallback without a home dir.
pub fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".agent-relay"))
        .unwrap_or_else(|| PathBuf::from(".agent-relay"))
        .join("config.toml")
}
