//! Retry with exponential backoff for tracker HTTP calls.
//!
//! Only transport failures (connection refused, timeouts) are retried. Any
//! HTTP response, whatever its status, is handed back to the caller.

use std::time::Duration;

/// Retry attempts after the initial request.
const MAX_RETRIES: u32 = 2;

/// First backoff delay; doubles per attempt (250ms, 500ms).
const BASE_DELAY_MS: u64 = 250;

/// Send a request built by `f`, retrying transport errors with backoff.
pub(crate) async fn retry_send<F, Fut>(endpoint: &str, f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                let delay = Duration::from_millis(BASE_DELAY_MS << attempt);
                tracing::warn!(
                    endpoint,
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "tracker request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}
