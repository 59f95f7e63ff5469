//! Single-attempt deadline enforcement.
//!
//! [`race`] runs one attempt of an operation against a timer. Whichever
//! side resolves first wins; the loser is cancelled by drop. No retry
//! logic lives here.

use std::future::Future;
use std::time::Duration;

/// A single attempt exceeded its allotted deadline.
///
/// Carries the configured limit so diagnostics can state which deadline
/// was missed, not just that one was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation timed out after {limit:?}")]
pub struct TimeoutError {
    pub limit: Duration,
}

/// Race `operation` against a timer of duration `limit`.
///
/// If the timer fires first the in-flight operation is dropped, which
/// cancels it. Operations that hold external resources (sockets, child
/// processes) must tie their own cleanup to drop; for HTTP calls the
/// same deadline is also handed to the request builder so the
/// connection is aborted rather than left to idle out.
pub async fn race<T, F>(operation: F, limit: Duration) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(outcome) => Ok(outcome),
        Err(_elapsed) => Err(TimeoutError { limit }),
    }
}
