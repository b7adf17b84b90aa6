//! Convenience re-exports for common use.

pub use crate::bot::AgentBot;
pub use crate::config::RelayConfig;
pub use crate::error::{RelayError, Result};
pub use crate::lifecycle::{ConversationController, TurnReport};
pub use crate::provider::{AgentTransport, ZhipuAgentProvider};
pub use crate::session::{Session, SessionStore};
pub use crate::stream::{StreamDecoder, Terminal};
pub use crate::types::{
    ContextKind, ConversationHandle, ConversationTurnResult, ReplyKind, ReplyOutcome, RequestId,
    TurnContext, Usage,
};
pub use crate::util::retry::RetryPolicy;
