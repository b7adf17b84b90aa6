//! Transport seam to the hosted agent application.

pub mod http;
pub mod zhipu;

use async_trait::async_trait;

use crate::error::RelayError;
use crate::stream::LineStream;
use crate::types::{ConversationHandle, RequestId};

pub use zhipu::ZhipuAgentProvider;

/// The three remote operations a turn is built from.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Provider name, for logs.
    fn provider_name(&self) -> &str;

    /// Create a new remote conversation.
    async fn create_conversation(&self) -> Result<ConversationHandle, RelayError>;

    /// Submit the user's text within a conversation.
    async fn create_request(
        &self,
        conversation: &ConversationHandle,
        prompt: &str,
    ) -> Result<RequestId, RelayError>;

    /// Open the event stream answering a request.
    ///
    /// Connect errors and non-success statuses are returned as `Err`; read
    /// errors surface as `Err` items on the stream.
    async fn open_stream(&self, request: &RequestId) -> Result<LineStream, RelayError>;
}
