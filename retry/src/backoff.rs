//! Inter-attempt delay policy.
//!
//! Exponential mode grows the delay per attempt and multiplies by a
//! jitter factor drawn uniformly from `[1.0, 1.5)`. Multiplicative
//! jitter (rather than full jitter) keeps the floor at the computed
//! delay, so retries never collapse to zero while concurrent callers
//! still desynchronize.

use std::time::Duration;

use crate::executor::RetryOptions;

/// Upper bound (exclusive) of the jitter multiplier.
const JITTER_SPREAD: f64 = 0.5;

/// Compute the delay before the retry that follows `attempt`.
///
/// `attempt` is 1-indexed: the delay after the first attempt uses
/// exponent zero. Fixed mode returns `initial_delay` unconditionally;
/// exponential mode is clamped to `max_delay` after jitter is applied.
#[must_use]
pub fn delay(attempt: u32, options: &RetryOptions) -> Duration {
    if !options.exponential {
        return options.initial_delay;
    }

    let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
    let base = options.initial_delay.as_secs_f64() * 2.0_f64.powi(exponent);
    let jitter = 1.0 + rand::random::<f64>() * JITTER_SPREAD;
    let capped = (base * jitter).min(options.max_delay.as_secs_f64());

    Duration::from_secs_f64(capped)
}
