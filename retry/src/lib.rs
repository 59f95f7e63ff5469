//! Bounded, cancellable retry execution.
//!
//! # Architecture
//!
//! The crate is organized around three leaf primitives and one
//! composition:
//!
//! - [`timeout`] - races a single attempt against a deadline
//! - [`backoff`] - computes the inter-attempt delay (fixed or
//!   exponential with multiplicative jitter)
//! - [`executor`] - composes the two into a bounded retry loop with a
//!   pluggable retry predicate and failure observer
//! - [`http`] - the HTTP-specific layer: a resilient send built on
//!   per-request deadlines, and the response classifier that lets the
//!   executor treat a semantically-failed response as retryable
//!
//! # Failure reporting
//!
//! Only the final attempt's error surfaces to the caller. Intermediate
//! failures are visible through [`executor::RetryObserver`], which is
//! invoked once per scheduled retry; callers that need the full attempt
//! history capture it there.
//!
//! # Cancellation
//!
//! A lost race cancels the losing side: the attempt future is dropped
//! when the deadline fires, and HTTP attempts additionally carry the
//! deadline on the request itself so the underlying connection is torn
//! down rather than leaked.

pub mod backoff;
pub mod executor;
pub mod http;
pub mod timeout;

pub use executor::{
    AttemptError, NoopObserver, Retry, RetryObserver, RetryOptions, TracingObserver,
};
pub use http::{FetchOptions, HttpFailure, send_resilient, status_check};
pub use timeout::TimeoutError;
