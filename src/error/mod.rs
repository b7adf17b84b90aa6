//! Error types for agent-relay.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote response carried no conversation id")]
    MissingConversationId,

    #[error("Remote response carried no request id")]
    MissingRequestId,

    #[error("Stream ended without any content")]
    NoContent,

    #[error("Gave up after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Stream error: {0}")]
    Stream(String),
}

impl RelayError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(e) if e.is_timeout() => ErrorCategory::Timeout,
            Self::Network(e) if e.is_status() => ErrorCategory::Rejected,
            Self::Network(e) if e.is_decode() => ErrorCategory::Malformed,
            Self::Network(_) | Self::Io(_) => ErrorCategory::Unreachable,
            Self::Api { .. } => ErrorCategory::Rejected,
            Self::Serialization(_) => ErrorCategory::Malformed,
            Self::MissingConversationId | Self::MissingRequestId => {
                ErrorCategory::MissingIdentifier
            }
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Stream(_) | Self::NoContent => ErrorCategory::Stream,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::RetriesExhausted { .. } => ErrorCategory::Exhausted,
        }
    }

    /// Whether another attempt at the same turn could plausibly succeed.
    ///
    /// The turn controller retries every failure regardless; this is exposed
    /// for callers layering their own policy on top.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => matches!(
                self.category(),
                ErrorCategory::Unreachable
                    | ErrorCategory::Timeout
                    | ErrorCategory::Stream
                    | ErrorCategory::MissingIdentifier
            ),
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        if let Self::Api { status: 401 | 403, .. } = self {
            return RecoverySuggestion::CheckCredentials;
        }
        match self.category() {
            ErrorCategory::Malformed => RecoverySuggestion::SkipAndContinue,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Exhausted => RecoverySuggestion::GiveUp,
            _ if self.is_retryable() => RecoverySuggestion::RetryWithBackoff,
            _ => RecoverySuggestion::GiveUp,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RelayError>;
