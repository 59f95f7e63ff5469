//! Short-lived signed deletion tokens.
//!
//! A purge must prove to the durable store that it is authorized to
//! delete one specific owner's state. The proof is a signed token
//! scoped to a single purpose and a short lifetime — distinct from the
//! general-purpose bearer credentials used for ordinary API calls, so a
//! leaked deletion token cannot be replayed for anything else once it
//! expires.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use scour_types::UserId;
use uuid::Uuid;

use crate::config::SigningConfig;

/// Fixed purpose claim: these tokens authorize releasing one owner's
/// state lock, nothing else.
pub const RELEASE_PURPOSE: &str = "lock-release";

/// Claim set carried by a deletion token.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ReleaseClaims {
    /// Owner whose state may be deleted.
    pub sub: String,
    /// Always [`RELEASE_PURPOSE`].
    pub purpose: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch; always strictly after `iat`.
    pub exp: i64,
    /// The durable-store service this token is intended for.
    pub aud: String,
    /// The application that minted it.
    pub iss: String,
    /// Unique token id; no two minted tokens share one.
    pub jti: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Precondition violation: tokens cannot be scoped to nobody.
    /// Fails before any signing or network activity.
    #[error("deletion token owner must not be empty")]
    EmptyOwner,
    #[error("deletion token encoding failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// Mints deletion tokens with a process-wide signing configuration.
pub struct TokenIssuer {
    signing: SigningConfig,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(signing: SigningConfig) -> Self {
        Self { signing }
    }

    /// Mint a deletion token for `owner` with the configured TTL.
    pub fn mint_release_token(&self, owner: &UserId) -> Result<String, TokenError> {
        self.mint_release_token_with_ttl(owner, self.signing.token_ttl())
    }

    /// Mint a deletion token for `owner` with an explicit TTL.
    ///
    /// The TTL floors at one second so `exp` is always strictly after
    /// `iat`.
    pub fn mint_release_token_with_ttl(
        &self,
        owner: &UserId,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        if owner.as_str().trim().is_empty() {
            return Err(TokenError::EmptyOwner);
        }

        let issued_at = chrono::Utc::now().timestamp();
        let expires_at = issued_at + ttl.as_secs().max(1) as i64;

        let claims = ReleaseClaims {
            sub: owner.as_str().to_string(),
            purpose: RELEASE_PURPOSE.to_string(),
            iat: issued_at,
            exp: expires_at,
            aud: self.signing.audience().to_string(),
            iss: self.signing.issuer().to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(self.signing.secret().as_bytes());
        Ok(encode(&header, &claims, &key)?)
    }
}

/// Decode and validate a deletion token against the signing
/// configuration: signature, expiry, audience and issuer.
pub fn verify_release_token(
    token: &str,
    signing: &SigningConfig,
) -> Result<ReleaseClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[signing.audience()]);
    validation.set_issuer(&[signing.issuer()]);

    let key = DecodingKey::from_secret(signing.secret().as_bytes());
    let data = decode::<ReleaseClaims>(token, &key, &validation)?;
    Ok(data.claims)
}
