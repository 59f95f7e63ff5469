//! Purge subsystem configuration.
//!
//! Raw TOML deserialization structs (with `Option` fields and loose
//! strings) stay private here; the public types are fully validated at
//! the parse boundary. Existence of a value is the proof of its
//! validity: an empty signing secret or a non-HTTP base URL never
//! survives deserialization.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("signing secret must not be empty")]
    EmptySecret,
    #[error("signing audience must not be empty")]
    EmptyAudience,
    #[error("signing issuer must not be empty")]
    EmptyIssuer,
    #[error("durable store base url is not valid: {0}")]
    InvalidBaseUrl(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Process-wide secret used to sign deletion tokens.
///
/// Note: `Debug` is manually implemented to redact the key material,
/// preventing accidental disclosure in logs or error messages.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SigningSecret(String);

impl SigningSecret {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret(<redacted>)")
    }
}

const DEFAULT_TOKEN_TTL_SECS: u64 = 60;

#[derive(Deserialize)]
struct RawSigningConfig {
    secret: SigningSecret,
    audience: String,
    issuer: String,
    #[serde(default = "default_token_ttl_secs")]
    token_ttl_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

/// Validated deletion-token signing material and scope.
///
/// Invariant: `secret`, `audience` and `issuer` are non-empty (enforced
/// via `#[serde(try_from)]` at the deserialization boundary).
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawSigningConfig")]
pub struct SigningConfig {
    secret: SigningSecret,
    audience: String,
    issuer: String,
    token_ttl: Duration,
}

impl TryFrom<RawSigningConfig> for SigningConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSigningConfig) -> Result<Self, Self::Error> {
        if raw.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if raw.audience.trim().is_empty() {
            return Err(ConfigError::EmptyAudience);
        }
        if raw.issuer.trim().is_empty() {
            return Err(ConfigError::EmptyIssuer);
        }
        Ok(Self {
            secret: raw.secret,
            audience: raw.audience,
            issuer: raw.issuer,
            token_ttl: Duration::from_secs(raw.token_ttl_secs),
        })
    }
}

impl SigningConfig {
    pub fn new(
        secret: SigningSecret,
        audience: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::try_from(RawSigningConfig {
            secret,
            audience: audience.into(),
            issuer: issuer.into(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        })
    }

    #[must_use]
    pub fn secret(&self) -> &SigningSecret {
        &self.secret
    }

    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }
}

const DEFAULT_DELETE_TIMEOUT_MS: u64 = 10_000;

#[derive(Deserialize)]
struct RawDurableStoreConfig {
    base_url: String,
    #[serde(default = "default_delete_timeout_ms")]
    timeout_ms: u64,
}

fn default_delete_timeout_ms() -> u64 {
    DEFAULT_DELETE_TIMEOUT_MS
}

/// Validated durable-store endpoint configuration.
///
/// Invariant: `base_url` is an absolute `http`/`https` URL, so request
/// paths can always be appended to it.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawDurableStoreConfig")]
pub struct DurableStoreConfig {
    base_url: Url,
    timeout: Duration,
}

impl TryFrom<RawDurableStoreConfig> for DurableStoreConfig {
    type Error = ConfigError;

    fn try_from(raw: RawDurableStoreConfig) -> Result<Self, Self::Error> {
        let base_url: Url = raw
            .base_url
            .parse()
            .map_err(|_| ConfigError::InvalidBaseUrl(raw.base_url.clone()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl(raw.base_url));
        }
        Ok(Self {
            base_url,
            timeout: Duration::from_millis(raw.timeout_ms),
        })
    }
}

impl DurableStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::try_from(RawDurableStoreConfig {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_DELETE_TIMEOUT_MS,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Top-level purge configuration.
///
/// A missing `[durable_store]` table is a legitimate deployment shape:
/// environments without a durable store treat purge as a configured
/// no-op rather than a failure.
#[derive(Debug, Clone, Deserialize)]
pub struct PurgeConfig {
    #[serde(default)]
    pub durable_store: Option<DurableStoreConfig>,
    pub signing: SigningConfig,
}

impl PurgeConfig {
    /// Load from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
