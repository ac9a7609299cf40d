//! Shared HTTP transport for provider clients
//!
//! POSTs a JSON body with exponential backoff on transient statuses.
//! A 429 is surfaced immediately as `RateLimited`.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, warn};

use super::LlmError;

/// Maximum number of retries for transient errors
pub(crate) const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
pub(crate) const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504 | 529)
}

/// Backoff before the given attempt (attempt 0 has none)
pub(crate) fn backoff_for(attempt: u32) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1))
}

/// Map a transport error, reporting client timeouts as `Timeout`
pub(crate) fn transport_error(e: reqwest::Error, timeout: Duration) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(timeout)
    } else {
        LlmError::Network(e)
    }
}

/// POST `body` to `url` with the given headers, retrying transient failures
///
/// `timeout` is the client's configured request timeout, carried into `LlmError::Timeout`.
pub(crate) async fn post_json(
    http: &Client,
    url: &str,
    headers: &[(&str, String)],
    body: &serde_json::Value,
    timeout: Duration,
) -> Result<Response, LlmError> {
    debug!(%url, "post_json: called");
    let mut last_error = None;

    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let backoff = backoff_for(attempt);
            warn!(attempt, backoff_ms = backoff.as_millis() as u64, "post_json: retrying after transient error");
            tokio::time::sleep(backoff).await;
        }

        let mut builder = http.post(url).header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, value);
        }

        let response = match builder.json(body).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(attempt, error = %e, "post_json: network error");
                last_error = Some(transport_error(e, timeout));
                continue;
            }
        };

        let status = response.status().as_u16();

        if status == 429 {
            debug!("post_json: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if is_retryable_status(status) && attempt < MAX_RETRIES {
            let text = response.text().await.unwrap_or_default();
            debug!(attempt, status, "post_json: retryable error");
            last_error = Some(LlmError::ApiError { status, message: text });
            continue;
        }

        if !response.status().is_success() {
            debug!(%status, "post_json: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        debug!("post_json: success");
        return Ok(response);
    }

    Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
}
