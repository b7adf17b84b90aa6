//! Bounded turn-level retry with a fixed backoff.

use std::time::Duration;

/// Retry policy configuration.
///
/// A turn gets `1 + max_retries` attempts. Between attempts the current
/// turn sleeps for `backoff`; nothing else is blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Fixed pause before each retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Total number of attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether a failure on `attempt` (1-based) earns another try.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }

    /// Sleep for the backoff before the next attempt.
    pub async fn wait(&self, attempt: u32) {
        tracing::warn!(
            attempt,
            max_attempts = self.max_attempts(),
            backoff_ms = self.backoff.as_millis() as u64,
            "Retrying turn after error"
        );
        tokio::time::sleep(self.backoff).await;
    }
}
