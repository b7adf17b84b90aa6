//! Event-stream decoder: turns classified lines into one terminal result.
//!
//! ```text
//! Listening ──finished output block──▶ Terminal(Done)
//!     │
//!     ├──end of stream, content───────▶ Terminal(Done)
//!     ├──end of stream, no content────▶ Terminal(NoContent)
//!     └──connect/status/read/deadline─▶ Terminal(TransportFailure)
//! ```

use std::future::Future;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, error, info, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::types::{ConversationTurnResult, Usage};
use crate::util::timeout::{deadline, with_timeout};

use super::classifier::{classify_line, ClassifiedEvent};
use super::lines::LineStream;
use super::payload::StreamPayload;

/// How a decoding run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Done,
    NoContent,
    TransportFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Listening,
    Terminal(Terminal),
}

/// Mutable state of one decoding run. Never shared between turns.
#[derive(Debug, Default)]
pub struct DecoderAccumulator {
    fragments: Vec<String>,
    usage: Option<Usage>,
    has_content: bool,
    terminal_output: Option<String>,
}

impl DecoderAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event. Returns `Terminal(Done)` as soon as a finished output
    /// block arrives; the caller must stop feeding after that.
    pub fn apply(&mut self, event: ClassifiedEvent) -> DecoderState {
        if self.terminal_output.is_some() {
            return DecoderState::Terminal(Terminal::Done);
        }

        match event {
            ClassifiedEvent::Data(value) => match StreamPayload::from_value(&value) {
                StreamPayload::Block(block) => {
                    if let Some(out) = block.finished_output() {
                        let out = out.trim_end();
                        info!(content = %out, "Got output content");
                        self.has_content = true;
                        self.terminal_output = Some(out.to_string());
                        return DecoderState::Terminal(Terminal::Done);
                    }
                }
                StreamPayload::Message(msg) => {
                    self.has_content = true;
                    self.fragments.push(msg);
                }
                StreamPayload::Usage(usage) => self.usage = Some(usage),
                StreamPayload::Other => {}
            },
            ClassifiedEvent::MalformedData { raw, error } => {
                warn!(%error, raw = %raw, "Failed to decode stream data, skipping");
            }
            ClassifiedEvent::Meta { field, value } => {
                debug!(%field, %value, "Stream header");
            }
            ClassifiedEvent::Ignorable => {}
        }
        DecoderState::Listening
    }

    pub fn usage(&self) -> Option<Usage> {
        self.usage
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    pub fn terminal_output_observed(&self) -> bool {
        self.terminal_output.is_some()
    }

    /// Close the run after the stream ended (or a definitive block arrived).
    pub fn finish(self, no_content_text: &str) -> DecodedTurn {
        if let Some(text) = self.terminal_output {
            return DecodedTurn {
                terminal: Terminal::Done,
                result: ConversationTurnResult::new(text, self.usage),
                error: None,
            };
        }

        let text = self.fragments.concat();
        if !self.has_content || text.is_empty() {
            error!("No valid response received");
            return DecodedTurn {
                terminal: Terminal::NoContent,
                result: ConversationTurnResult::new(no_content_text, None),
                error: Some(RelayError::NoContent),
            };
        }

        DecodedTurn {
            terminal: Terminal::Done,
            result: ConversationTurnResult::new(text, self.usage),
            error: None,
        }
    }
}

/// Outcome of [`StreamDecoder::decode`].
#[derive(Debug)]
pub struct DecodedTurn {
    pub terminal: Terminal,
    pub result: ConversationTurnResult,
    /// Why the run ended without content, for logging.
    pub error: Option<RelayError>,
}

/// Consumes one event stream into a [`ConversationTurnResult`].
///
/// Transport failures are absorbed: they produce an apologetic result, never
/// an `Err`.
#[derive(Debug, Clone)]
pub struct StreamDecoder {
    read_timeout: Duration,
    no_content_text: String,
    transport_failure_text: String,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::from_config(&RelayConfig::default())
    }
}

impl StreamDecoder {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            read_timeout: config.stream_read_timeout(),
            no_content_text: config.replies.no_content.clone(),
            transport_failure_text: config.replies.transport_failure.clone(),
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Open the stream and consume it.
    ///
    /// Both opening and every individual read are bounded by the read timeout.
    pub async fn decode<F>(&self, open: F) -> DecodedTurn
    where
        F: Future<Output = Result<LineStream, RelayError>>,
    {
        let mut lines = match with_timeout(self.read_timeout, open).await {
            Ok(lines) => lines,
            Err(e) => return self.transport_failure(e),
        };

        let mut acc = DecoderAccumulator::new();
        loop {
            let next = match deadline(self.read_timeout, lines.next()).await {
                Ok(next) => next,
                Err(e) => return self.transport_failure(e),
            };
            match next {
                None => break,
                Some(Err(e)) => return self.transport_failure(e),
                Some(Ok(line)) => {
                    if let DecoderState::Terminal(_) = acc.apply(classify_line(&line)) {
                        break;
                    }
                }
            }
        }

        acc.finish(&self.no_content_text)
    }

    fn transport_failure(&self, e: RelayError) -> DecodedTurn {
        error!(error = %e, "Get SSE response failed");
        DecodedTurn {
            terminal: Terminal::TransportFailure,
            result: ConversationTurnResult::new(self.transport_failure_text.clone(), None),
            error: Some(e),
        }
    }
}
