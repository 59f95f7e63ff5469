//! Bounded retry loop over a fallible async operation.
//!
//! Each attempt is raced against a per-attempt deadline; failures flow
//! through a retry predicate, and scheduled retries are announced to an
//! observer before the backoff sleep. Attempts are strictly sequential:
//! attempt N+1 never starts before attempt N has resolved and the delay
//! has elapsed.

use std::future::Future;
use std::time::Duration;

use crate::backoff;
use crate::timeout::{self, TimeoutError};

/// Per-call retry configuration.
///
/// Constructed fresh per operation, usually by struct update from
/// `RetryOptions::default()`. Holds no callbacks: the predicate and
/// observer live on [`Retry`] so this stays a plain value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOptions {
    /// Total attempt budget, including the first attempt. Clamped to a
    /// minimum of 1 at execution time.
    pub max_attempts: u32,
    /// Delay before the first retry; also the fixed delay when
    /// `exponential` is off.
    pub initial_delay: Duration,
    /// Ceiling for the computed delay, applied after jitter.
    pub max_delay: Duration,
    /// Exponential growth with jitter when true, fixed delay when false.
    pub exponential: bool,
    /// Deadline for each individual attempt.
    pub timeout: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(30_000),
            exponential: true,
            timeout: Duration::from_millis(15_000),
        }
    }
}

/// Failure of a single attempt: either the deadline fired, or the
/// operation itself failed.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError<E>
where
    E: std::error::Error,
{
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
    #[error(transparent)]
    Operation(E),
}

impl<E> AttemptError<E>
where
    E: std::error::Error,
{
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, AttemptError::Timeout(_))
    }
}

/// Receives every failed attempt that is about to be retried.
///
/// The final attempt's failure does not reach the observer; it is
/// returned to the caller instead. Implementations must not panic and
/// must not block; they run synchronously before the backoff sleep.
pub trait RetryObserver<E>: Send + Sync
where
    E: std::error::Error,
{
    fn on_attempt_failed(&self, error: &AttemptError<E>, attempt: u32, next_delay: Duration);
}

/// Default observer: retries happen silently.
pub struct NoopObserver;

impl<E> RetryObserver<E> for NoopObserver
where
    E: std::error::Error,
{
    fn on_attempt_failed(&self, _error: &AttemptError<E>, _attempt: u32, _next_delay: Duration) {}
}

/// Observer that emits one structured warning per scheduled retry.
pub struct TracingObserver {
    operation: &'static str,
}

impl TracingObserver {
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}

impl<E> RetryObserver<E> for TracingObserver
where
    E: std::error::Error,
{
    fn on_attempt_failed(&self, error: &AttemptError<E>, attempt: u32, next_delay: Duration) {
        tracing::warn!(
            operation = self.operation,
            attempt,
            timeout = error.is_timeout(),
            error = %error,
            delay_ms = next_delay.as_millis() as u64,
            "attempt failed, retrying"
        );
    }
}

/// Retry runner: options plus the retry predicate and observer.
///
/// The default predicate retries every failure; the default observer is
/// a no-op. Both are replaced via the builder methods.
pub struct Retry<E>
where
    E: std::error::Error,
{
    options: RetryOptions,
    should_retry: Box<dyn Fn(&AttemptError<E>) -> bool + Send + Sync>,
    observer: Box<dyn RetryObserver<E>>,
}

impl<E> Retry<E>
where
    E: std::error::Error,
{
    #[must_use]
    pub fn new(options: RetryOptions) -> Self {
        Self {
            options,
            should_retry: Box::new(|_| true),
            observer: Box::new(NoopObserver),
        }
    }

    /// Replace the retry predicate. A failure the predicate rejects is
    /// returned immediately, regardless of remaining budget.
    #[must_use]
    pub fn should_retry<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&AttemptError<E>) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Box::new(predicate);
        self
    }

    /// Replace the failure observer.
    #[must_use]
    pub fn observe<O>(mut self, observer: O) -> Self
    where
        O: RetryObserver<E> + 'static,
    {
        self.observer = Box::new(observer);
        self
    }

    /// Run `operation` until it succeeds or the attempt budget is
    /// exhausted. Fails with the error of the final attempt only;
    /// earlier failures are visible through the observer.
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T, AttemptError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_checked(operation, |_| None).await
    }

    /// [`run`](Self::run) with a success inspector.
    ///
    /// When an attempt yields a value, attempts remain, and `check`
    /// synthesizes a failure the predicate accepts, the value is
    /// discarded and the attempt is treated as failed. In every other
    /// case the value is the final result — including a semantically
    /// failed value on the last attempt, which is returned as-is for
    /// the caller to inspect.
    pub async fn run_checked<T, F, Fut, C>(
        &self,
        mut operation: F,
        check: C,
    ) -> Result<T, AttemptError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&T) -> Option<E>,
    {
        let budget = self.options.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match timeout::race(operation(), self.options.timeout).await {
                Ok(Ok(value)) => {
                    let rejected = if attempt < budget { check(&value) } else { None };
                    match rejected {
                        Some(failure) => {
                            let candidate = AttemptError::Operation(failure);
                            if (self.should_retry)(&candidate) {
                                candidate
                            } else {
                                return Ok(value);
                            }
                        }
                        None => return Ok(value),
                    }
                }
                Ok(Err(failure)) => AttemptError::Operation(failure),
                Err(timed_out) => AttemptError::Timeout(timed_out),
            };

            if attempt >= budget || !(self.should_retry)(&error) {
                return Err(error);
            }

            let pause = backoff::delay(attempt, &self.options);
            self.observer.on_attempt_failed(&error, attempt, pause);
            tokio::time::sleep(pause).await;
        }
    }
}
