//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::RelayError;

/// Wrap a fallible future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, RelayError>>,
) -> Result<T, RelayError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(RelayError::Timeout(duration.as_millis() as u64)),
    }
}

/// Wrap an infallible future (e.g. `stream.next()`) with a timeout.
pub async fn deadline<T>(
    duration: Duration,
    future: impl Future<Output = T>,
) -> Result<T, RelayError> {
    tokio::time::timeout(duration, future)
        .await
        .map_err(|_| RelayError::Timeout(duration.as_millis() as u64))
}
