//! HTTP-specific retry composition.
//!
//! Two pieces live here:
//!
//! - [`send_resilient`]: a thin wrapper around a single network call.
//!   Each attempt carries its own deadline on the request (so a timeout
//!   aborts the connection rather than leaking it) and failed attempts
//!   are retried after a fixed delay. The raw response is returned
//!   without status inspection.
//! - [`status_check`]: the response classifier for
//!   [`Retry::run_checked`](crate::executor::Retry::run_checked),
//!   turning a non-2xx response into a retryable [`HttpFailure`] for
//!   callers that route status-aware retries through the executor.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};

/// Failure of one HTTP attempt.
#[derive(Debug, thiserror::Error)]
pub enum HttpFailure {
    /// Network-level failure: connection refused, reset, DNS, or the
    /// per-request deadline firing.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request completed but the remote signaled failure.
    #[error("remote returned {status} {status_text}")]
    Status { status: u16, status_text: String },
}

impl HttpFailure {
    /// Whether this failure was the per-request deadline firing.
    /// Distinguished for logging only, never for control flow.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            HttpFailure::Transport(error) => error.is_timeout(),
            HttpFailure::Status { .. } => false,
        }
    }
}

/// Classify a response for status-aware retries: `Some` for any
/// non-2xx status, `None` for success.
#[must_use]
pub fn status_check(response: &Response) -> Option<HttpFailure> {
    let status = response.status();
    if status.is_success() {
        return None;
    }
    Some(HttpFailure::Status {
        status: status.as_u16(),
        status_text: status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string(),
    })
}

/// Configuration for [`send_resilient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Total attempt budget, including the first attempt.
    pub attempts: u32,
    /// Per-attempt deadline, bound to the request itself.
    pub timeout: Duration,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_millis(15_000),
            retry_delay: Duration::from_millis(1_000),
        }
    }
}

/// Send a request, retrying transport failures with a fixed delay.
///
/// `build_request` is called once per attempt, since request builders are
/// consumed by sending, so the caller supplies a fresh one each time.
/// The response is returned as soon as the transport succeeds, whatever
/// its status; status-aware retry is the caller's concern.
pub async fn send_resilient<F>(
    build_request: F,
    options: &FetchOptions,
) -> Result<Response, HttpFailure>
where
    F: Fn() -> RequestBuilder,
{
    let budget = options.attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match build_request().timeout(options.timeout).send().await {
            Ok(response) => return Ok(response),
            Err(error) => {
                let failure = HttpFailure::Transport(error);
                if attempt >= budget {
                    return Err(failure);
                }
                let cause = if failure.is_timeout() { "timeout" } else { "transport" };
                tracing::warn!(
                    attempt,
                    budget,
                    cause,
                    error = %failure,
                    delay_ms = options.retry_delay.as_millis() as u64,
                    "request failed, retrying"
                );
                tokio::time::sleep(options.retry_delay).await;
            }
        }
    }
}
