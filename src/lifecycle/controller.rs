//! Drives one turn through the three remote steps with bounded retry.

use std::sync::Arc;

use tracing::{error, info, warn, Instrument};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::provider::AgentTransport;
use crate::session::Session;
use crate::stream::{StreamDecoder, Terminal};
use crate::types::ConversationTurnResult;
use crate::util::retry::RetryPolicy;

/// Result of [`ConversationController::run_turn`].
#[derive(Debug)]
pub struct TurnReport {
    pub result: ConversationTurnResult,
    /// Attempts made, `1..=policy.max_attempts()`.
    pub attempts: u32,
    /// Failure of the final attempt, or the reason the stream produced no
    /// content.
    pub last_error: Option<RelayError>,
}

/// Owns the create-conversation → create-request → stream protocol.
pub struct ConversationController {
    transport: Arc<dyn AgentTransport>,
    decoder: StreamDecoder,
    retry: RetryPolicy,
    exhausted_text: String,
}

impl ConversationController {
    pub fn new(transport: Arc<dyn AgentTransport>, config: &RelayConfig) -> Self {
        Self {
            transport,
            decoder: StreamDecoder::from_config(config),
            retry: config.retry.policy(),
            exhausted_text: config.replies.exhausted.clone(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_decoder(mut self, decoder: StreamDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Run one turn for `message` against `session`.
    ///
    /// Never fails: after the last attempt the fixed exhausted text is
    /// returned with zero usage. A conversation handle stored by an earlier
    /// attempt is reused by later ones.
    pub async fn run_turn(&self, session: &mut Session, message: &str) -> TurnReport {
        let mut attempt = 1;
        loop {
            let span = tracing::info_span!(
                "turn_attempt",
                session = session.id(),
                provider = self.transport.provider_name(),
                attempt,
            );
            match self.attempt(session, message).instrument(span).await {
                Ok((result, last_error)) => {
                    return TurnReport {
                        result,
                        attempts: attempt,
                        last_error,
                    };
                }
                Err(e) => {
                    error!(
                        session = session.id(),
                        attempt,
                        error = %e,
                        category = ?e.category(),
                        "Turn attempt failed"
                    );
                    if !self.retry.should_retry(attempt) {
                        let exhausted = RelayError::RetriesExhausted { attempts: attempt };
                        error!(session = session.id(), error = %exhausted, last = %e, "Turn retries exhausted");
                        return TurnReport {
                            result: ConversationTurnResult::without_completion(
                                self.exhausted_text.clone(),
                            ),
                            attempts: attempt,
                            last_error: Some(e),
                        };
                    }
                    self.retry.wait(attempt).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(
        &self,
        session: &mut Session,
        message: &str,
    ) -> Result<(ConversationTurnResult, Option<RelayError>), RelayError> {
        let conversation = match session.conversation_handle().cloned() {
            Some(handle) => handle,
            None => {
                let created = self.transport.create_conversation().await?;
                // Stored before any further call so retries reuse it.
                session.set_conversation_handle(created).clone()
            }
        };

        let request = self.transport.create_request(&conversation, message).await?;
        info!(request_id = %request, "Getting SSE response");

        let decoded = self.decoder.decode(self.transport.open_stream(&request)).await;
        if decoded.terminal == Terminal::TransportFailure {
            warn!(request_id = %request, "Stream failed, replying with fallback text");
        }
        Ok((decoded.result, decoded.error))
    }
}
