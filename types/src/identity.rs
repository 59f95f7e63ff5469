use std::fmt;

use crate::ids::{BusinessId, GrantId, UserId};

/// Composite key identifying the session state to remove from both
/// backing stores.
///
/// The purge subsystem treats the triple as opaque: it is forwarded to
/// the durable store as query parameters and folded into the cache key,
/// but never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PurgeIdentity {
    pub user_id: UserId,
    pub business_id: BusinessId,
    pub grant_id: GrantId,
}

impl PurgeIdentity {
    #[must_use]
    pub fn new(user_id: UserId, business_id: BusinessId, grant_id: GrantId) -> Self {
        Self {
            user_id,
            business_id,
            grant_id,
        }
    }

    /// Deterministic cache key for the ephemeral store.
    ///
    /// The same identity always maps to the same key, so repeating a
    /// purge (or purging after a re-login) hits the same entry.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.user_id.as_str(),
            self.business_id.as_str(),
            self.grant_id.as_str()
        )
    }
}

impl fmt::Display for PurgeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.user_id, self.business_id, self.grant_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> PurgeIdentity {
        PurgeIdentity::new(
            UserId::new("usr-1"),
            BusinessId::new("biz-2"),
            GrantId::new("grant-3"),
        )
    }

    #[test]
    fn cache_key_is_deterministic_composite() {
        assert_eq!(identity().cache_key(), "usr-1:biz-2:grant-3");
        assert_eq!(identity().cache_key(), identity().cache_key());
    }

    #[test]
    fn display_matches_cache_key() {
        let id = identity();
        assert_eq!(id.to_string(), id.cache_key());
    }
}
