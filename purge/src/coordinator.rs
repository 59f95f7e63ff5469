//! Dual-store purge coordination.
//!
//! One `purge()` call walks a fixed sequence: mint a deletion token,
//! delete the durable-store record, drop the cache entry, combine the
//! two dispositions. Backend failures of either store become data in
//! the [`PurgeResult`]; only precondition violations (an unmintable
//! token) surface as errors. The coordinator holds no state between
//! calls, so repeating a purge is safe.

use scour_types::redact::redact_id;
use scour_types::{PhaseOutcome, PurgeIdentity, PurgeResult, SessionKey};

use crate::cache::SessionCache;
use crate::config::PurgeConfig;
use crate::durable::{DeleteOutcome, DurableStoreClient};
use crate::token::{TokenError, TokenIssuer};

#[derive(Debug, thiserror::Error)]
pub enum PurgeError {
    /// Fatal precondition violation: the deletion token could not be
    /// minted. This is a programming or configuration defect, never a
    /// backend failure, and nothing has been attempted against either
    /// store when it is returned.
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Coordinates session-state removal across the durable store and the
/// ephemeral cache.
///
/// Collaborators are injected at construction; the coordinator never
/// reaches for ambient state, so concurrent purges for different
/// identities cannot interfere.
pub struct PurgeCoordinator<C>
where
    C: SessionCache,
{
    durable: Option<DurableStoreClient>,
    issuer: TokenIssuer,
    cache: C,
}

impl<C> PurgeCoordinator<C>
where
    C: SessionCache,
{
    #[must_use]
    pub fn new(config: &PurgeConfig, cache: C) -> Self {
        Self {
            durable: config.durable_store.as_ref().map(DurableStoreClient::new),
            issuer: TokenIssuer::new(config.signing.clone()),
            cache,
        }
    }

    /// The injected cache collaborator.
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Purge `identity`'s state from both stores.
    ///
    /// Without a configured durable store the whole purge is a no-op by
    /// design: no token is minted, no network call is made, no cache
    /// entry is touched, and the result reports success.
    ///
    /// Partial failure never raises; callers inspect the result to
    /// decide whether best-effort cleanup is acceptable.
    pub async fn purge(
        &self,
        identity: &PurgeIdentity,
        session_key: Option<&SessionKey>,
    ) -> Result<PurgeResult, PurgeError> {
        let user = redact_id(identity.user_id.as_str());

        let Some(durable) = self.durable.as_ref() else {
            tracing::info!(%user, "purge skipped: no durable store configured");
            return Ok(PurgeResult::skipped());
        };

        let token = self.issuer.mint_release_token(&identity.user_id)?;

        let delete = durable.delete_state(identity, &token).await;
        match delete {
            DeleteOutcome::Failed { cause } => {
                tracing::warn!(%user, cause = %cause, "durable store purge failed");
            }
            outcome => {
                tracing::debug!(%user, outcome = %outcome.phase(), "durable store purge done");
            }
        }

        let cache_phase = self.drop_cache_entry(identity, session_key, &user).await;

        let result = PurgeResult {
            durable: delete.phase(),
            cache: cache_phase,
        };
        if result.overall_success() {
            tracing::debug!(%user, "session purge complete");
        } else {
            tracing::warn!(
                %user,
                durable = %result.durable,
                cache = %result.cache,
                "session purge incomplete"
            );
        }
        Ok(result)
    }

    async fn drop_cache_entry(
        &self,
        identity: &PurgeIdentity,
        session_key: Option<&SessionKey>,
        user: &str,
    ) -> PhaseOutcome {
        // The session key only gates the attempt; the entry itself is
        // keyed by the identity triple.
        match session_key {
            Some(key) if !key.is_blank() => {
                match self.cache.drop_entry(&identity.cache_key()).await {
                    Ok(()) => PhaseOutcome::Cleared,
                    Err(error) => {
                        tracing::warn!(user, error = %error, "cache drop failed");
                        PhaseOutcome::Failed
                    }
                }
            }
            _ => {
                tracing::debug!(user, "cache drop not attempted: no session key");
                PhaseOutcome::Skipped
            }
        }
    }
}
