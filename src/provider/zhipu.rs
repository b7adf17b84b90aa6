//! Zhipu agent-application transport (`/v2/application`, `/v2/model-api`).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::stream::{lines_from_bytes, LineStream};
use crate::types::{ConversationHandle, RequestId};

use super::http::{bearer_headers, build_client, ensure_success, event_stream_headers};
use super::AgentTransport;

pub struct ZhipuAgentProvider {
    client: reqwest::Client,
    api_key: String,
    app_id: String,
    base_url: String,
    input_label: String,
    request_timeout: Duration,
}

impl ZhipuAgentProvider {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        Ok(Self::with_client(build_client(config)?, config))
    }

    /// Use an existing client (shared pool, custom TLS, tests).
    pub fn with_client(client: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            app_id: config.app_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            input_label: config.input_label.clone(),
            request_timeout: config.request_timeout(),
        }
    }

    fn conversation_url(&self) -> String {
        format!("{}/v2/application/{}/conversation", self.base_url, self.app_id)
    }

    fn request_url(&self) -> String {
        format!("{}/v2/application/generate_request_id", self.base_url)
    }

    fn stream_url(&self, request: &RequestId) -> String {
        format!("{}/v2/model-api/{}/sse-invoke", self.base_url, request)
    }

    fn build_request_body<'a>(
        &'a self,
        conversation: &'a ConversationHandle,
        prompt: &'a str,
    ) -> GenerateRequestBody<'a> {
        GenerateRequestBody {
            app_id: &self.app_id,
            conversation_id: conversation.as_str(),
            key_value_pairs: vec![KeyValuePair {
                id: "user",
                kind: "input",
                name: &self.input_label,
                value: prompt,
            }],
        }
    }
}

#[async_trait]
impl AgentTransport for ZhipuAgentProvider {
    fn provider_name(&self) -> &str {
        "zhipu-agent"
    }

    async fn create_conversation(&self) -> Result<ConversationHandle, RelayError> {
        let url = self.conversation_url();
        debug!(%url, "Creating conversation");

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .timeout(self.request_timeout)
            .send()
            .await?;
        let data: Envelope<ConversationData> = ensure_success(resp).await?.json().await?;

        let id = data
            .data
            .and_then(|d| d.conversation_id)
            .filter(|id| !id.is_empty())
            .ok_or(RelayError::MissingConversationId)?;
        info!(conversation_id = %id, "Created conversation");
        Ok(ConversationHandle::new(id))
    }

    async fn create_request(
        &self,
        conversation: &ConversationHandle,
        prompt: &str,
    ) -> Result<RequestId, RelayError> {
        let url = self.request_url();
        let body = self.build_request_body(conversation, prompt);
        debug!(%url, conversation_id = %conversation, "Creating request");

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await?;
        let data: Envelope<RequestData> = ensure_success(resp).await?.json().await?;

        let id = data
            .data
            .and_then(|d| d.id)
            .filter(|id| !id.is_empty())
            .ok_or(RelayError::MissingRequestId)?;
        info!(request_id = %id, "Created request");
        Ok(RequestId::new(id))
    }

    async fn open_stream(&self, request: &RequestId) -> Result<LineStream, RelayError> {
        let url = self.stream_url(request);
        debug!(%url, "Opening event stream");

        let resp = self
            .client
            .post(&url)
            .headers(event_stream_headers(&self.api_key))
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        Ok(lines_from_bytes(resp.bytes_stream()))
    }
}

// Zhipu wire types (internal)

#[derive(Serialize)]
struct GenerateRequestBody<'a> {
    app_id: &'a str,
    conversation_id: &'a str,
    key_value_pairs: Vec<KeyValuePair<'a>>,
}

#[derive(Serialize)]
struct KeyValuePair<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    name: &'a str,
    value: &'a str,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct ConversationData {
    conversation_id: Option<String>,
}

#[derive(Deserialize)]
struct RequestData {
    id: Option<String>,
}
