//! Log-safe rendering of identifiers.
//!
//! Structured purge events carry the identity they acted on. Raw user
//! and grant identifiers are account-scoped secrets in some deployments,
//! so log fields use a shortened, non-reversible display form instead of
//! the full value.

/// Shorten an identifier for logging: keep a short prefix, drop the rest.
///
/// Values of four characters or fewer are fully masked; a prefix of a
/// short id is the id.
#[must_use]
pub fn redact_id(id: &str) -> String {
    const VISIBLE_PREFIX: usize = 4;

    let trimmed = id.trim();
    if trimmed.len() <= VISIBLE_PREFIX {
        return "***".to_string();
    }
    let prefix: String = trimmed.chars().take(VISIBLE_PREFIX).collect();
    format!("{prefix}***")
}
