//! Token usage reported by the remote agent.

use serde::{Deserialize, Serialize};

/// Usage snapshot carried by a `usage` stream event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            completion_tokens,
            total_tokens,
        }
    }

    /// Zero usage, used for results that never reached the model.
    pub fn zero() -> Self {
        Self::default()
    }
}
