//! Backoff for store access in background tasks.

use crate::RetryConfig;
use brevity_error::BrevityResult;
use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Runs `operation`, retrying transient failures with jittered exponential backoff.
///
/// Permanent errors (malformed values, missing terms) fail immediately.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut operation: F) -> BrevityResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BrevityResult<T>>,
{
    let strategy = ExponentialBackoff::from_millis(config.initial_delay_ms.max(1))
        .factor(2)
        .max_delay(Duration::from_secs(config.max_delay_secs))
        .map(jitter)
        .take(config.attempts);

    Retry::spawn(strategy, || {
        let attempt = operation();
        async move {
            match attempt.await {
                Ok(value) => Ok(value),
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "Transient error, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => Err(RetryError::Permanent(e)),
            }
        }
    })
    .await
}
