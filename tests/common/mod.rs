//! Shared test helpers and a scripted transport.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;

use agent_relay::config::RelayConfig;
use agent_relay::error::RelayError;
use agent_relay::provider::AgentTransport;
use agent_relay::stream::LineStream;
use agent_relay::types::{ConversationHandle, RequestId};
use agent_relay::util::retry::RetryPolicy;

/// What `open_stream` should produce for one call.
pub enum ScriptedStream {
    /// Yield these lines, then end.
    Lines(Vec<String>),
    /// Yield these lines, then fail the read.
    LinesThenError(Vec<String>, RelayError),
    /// Yield these lines, then never yield again.
    LinesThenHang(Vec<String>),
    /// Fail to open.
    OpenError(RelayError),
}

/// Transport that replays queued responses and counts calls.
///
/// With empty queues it answers with fresh ids and an empty stream.
#[derive(Default)]
pub struct ScriptedTransport {
    conversations: Mutex<VecDeque<Result<ConversationHandle, RelayError>>>,
    requests: Mutex<VecDeque<Result<RequestId, RelayError>>>,
    streams: Mutex<VecDeque<ScriptedStream>>,
    conversation_delay: Mutex<Option<Duration>>,
    prompts: Mutex<Vec<(String, String)>>,
    pub conversation_calls: AtomicUsize,
    pub request_calls: AtomicUsize,
    pub stream_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_conversation(&self, result: Result<ConversationHandle, RelayError>) {
        self.conversations.lock().unwrap().push_back(result);
    }

    pub fn queue_request(&self, result: Result<RequestId, RelayError>) {
        self.requests.lock().unwrap().push_back(result);
    }

    pub fn queue_stream(&self, stream: ScriptedStream) {
        self.streams.lock().unwrap().push_back(stream);
    }

    /// Queue a stream of `data:` lines built from JSON values.
    pub fn queue_data(&self, events: Vec<serde_json::Value>) {
        self.queue_stream(ScriptedStream::Lines(data_lines(events)));
    }

    pub fn delay_conversation_creation(&self, delay: Duration) {
        *self.conversation_delay.lock().unwrap() = Some(delay);
    }

    /// `(conversation id, prompt)` of every create-request call.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn conversations_created(&self) -> usize {
        self.conversation_calls.load(Ordering::SeqCst)
    }

    pub fn requests_created(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }

    pub fn streams_opened(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.conversations_created() + self.requests_created() + self.streams_opened()
    }
}

#[async_trait]
impl AgentTransport for ScriptedTransport {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn create_conversation(&self) -> Result<ConversationHandle, RelayError> {
        let n = self.conversation_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = *self.conversation_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.conversations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ConversationHandle::new(format!("conv-{n}"))))
    }

    async fn create_request(
        &self,
        conversation: &ConversationHandle,
        prompt: &str,
    ) -> Result<RequestId, RelayError> {
        let n = self.request_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts
            .lock()
            .unwrap()
            .push((conversation.to_string(), prompt.to_string()));
        self.requests
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RequestId::new(format!("req-{n}"))))
    }

    async fn open_stream(&self, _request: &RequestId) -> Result<LineStream, RelayError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ScriptedStream::Lines(Vec::new()));
        Ok(match scripted {
            ScriptedStream::Lines(lines) => lines_stream(lines),
            ScriptedStream::LinesThenError(lines, err) => lines_stream(lines)
                .chain(futures::stream::once(async move { Err(err) }))
                .boxed(),
            ScriptedStream::LinesThenHang(lines) => lines_stream(lines)
                .chain(futures::stream::pending())
                .boxed(),
            ScriptedStream::OpenError(err) => return Err(err),
        })
    }
}

pub fn lines_stream(lines: Vec<String>) -> LineStream {
    futures::stream::iter(lines.into_iter().map(Ok)).boxed()
}

pub fn data_lines(events: Vec<serde_json::Value>) -> Vec<String> {
    events
        .into_iter()
        .flat_map(|e| vec!["event: add".to_string(), format!("data: {e}"), String::new()])
        .collect()
}

pub fn msg(text: &str) -> serde_json::Value {
    serde_json::json!({ "msg": text })
}

pub fn usage(completion: u32, total: u32) -> serde_json::Value {
    serde_json::json!({ "usage": { "completion_tokens": completion, "total_tokens": total } })
}

pub fn finished_output(text: &str) -> serde_json::Value {
    serde_json::json!({
        "extra_input": {
            "block_data": {
                "block_type": "output",
                "block_status": "finished",
                "out_put": { "out_content": text }
            }
        }
    })
}

/// Config with fast retries for tests that run on real time.
pub fn test_config() -> RelayConfig {
    let mut config = RelayConfig {
        api_key: "test-key".into(),
        app_id: "app-1".into(),
        ..Default::default()
    };
    config.retry.backoff_ms = 1;
    config
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        backoff: Duration::from_millis(1),
    }
}
