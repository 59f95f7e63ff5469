//! Tagged purge outcomes.
//!
//! Partial failure is data, not an error: one store clearing while the
//! other does not must stay visible to the caller without unwinding the
//! surrounding request. Each store therefore reports a [`PhaseOutcome`]
//! and the pair rolls up into a [`PurgeResult`].

use std::fmt;

/// Disposition of a single store during one purge call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseOutcome {
    /// The store confirmed the delete.
    Cleared,
    /// The record was already gone (a 404 on delete); deletion is
    /// idempotent, so this counts as cleared.
    AlreadyAbsent,
    /// The phase was not attempted by design: no durable store is
    /// configured, or no session key binds a cache entry.
    Skipped,
    /// The store could not be cleared within this call.
    Failed,
}

impl PhaseOutcome {
    /// Whether the store can be considered clear after this call.
    #[must_use]
    pub fn is_cleared(self) -> bool {
        !matches!(self, PhaseOutcome::Failed)
    }
}

impl fmt::Display for PhaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PhaseOutcome::Cleared => "cleared",
            PhaseOutcome::AlreadyAbsent => "already_absent",
            PhaseOutcome::Skipped => "skipped",
            PhaseOutcome::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

/// Combined result of one purge call across both stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PurgeResult {
    pub durable: PhaseOutcome,
    pub cache: PhaseOutcome,
}

impl PurgeResult {
    /// Result for an environment with no durable store configured:
    /// purge is a no-op by design, not a failure.
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            durable: PhaseOutcome::Skipped,
            cache: PhaseOutcome::Skipped,
        }
    }

    #[must_use]
    pub fn durable_cleared(&self) -> bool {
        self.durable.is_cleared()
    }

    #[must_use]
    pub fn cache_cleared(&self) -> bool {
        self.cache.is_cleared()
    }

    /// True only when both stores are clear.
    #[must_use]
    pub fn overall_success(&self) -> bool {
        self.durable_cleared() && self.cache_cleared()
    }

    /// True when the whole purge was a configured no-op.
    #[must_use]
    pub fn was_skipped(&self) -> bool {
        self.durable == PhaseOutcome::Skipped && self.cache == PhaseOutcome::Skipped
    }
}
