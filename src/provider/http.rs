//! HTTP client construction and response helpers.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::config::RelayConfig;
use crate::error::RelayError;

/// Build a client for one transport instance.
///
/// Only the connect phase is bounded here; request and stream deadlines are
/// applied per call.
pub fn build_client(config: &RelayConfig) -> Result<reqwest::Client, RelayError> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .pool_max_idle_per_host(10)
        .build()
        .map_err(RelayError::from)
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Bearer headers plus `Accept: text/event-stream`.
pub fn event_stream_headers(api_key: &str) -> HeaderMap {
    let mut headers = bearer_headers(api_key);
    headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
    headers
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> RelayError {
    RelayError::api(status, extract_error_message(body).unwrap_or_else(|| body.to_string()))
}

/// Consume a response, failing on non-2xx statuses.
pub async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, RelayError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_to_error(status.as_u16(), &body))
}

fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("msg"))
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
