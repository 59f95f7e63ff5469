//! Session-state purge across two independently-failing stores.
//!
//! # Architecture
//!
//! Tearing down a user's session touches a durable record store
//! (reached over HTTP) and a fast ephemeral cache. The two can fail
//! independently, so the subsystem is built around explicit,
//! per-store dispositions rather than all-or-nothing semantics:
//!
//! - [`token`] - mints the short-lived signed token that authorizes
//!   one owner's state deletion
//! - [`durable`] - the durable store's `DELETE` client (fail-fast,
//!   404-tolerant)
//! - [`cache`] - the injected cache collaborator and its in-process
//!   implementation
//! - [`coordinator`] - runs the full purge and combines both outcomes
//!   into one [`PurgeResult`](scour_types::PurgeResult)
//! - [`config`] - validated TOML-backed configuration
//!
//! # Failure policy
//!
//! Backend trouble (timeouts, non-2xx statuses, cache connection loss)
//! is reported as data and logged; it never unwinds the caller. Only
//! precondition violations (an empty owner id, unusable signing
//! material) surface as errors, because they indicate a defect rather
//! than a transient condition.

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod durable;
pub mod token;

pub use cache::{CacheError, MemoryCache, SessionCache};
pub use config::{ConfigError, DurableStoreConfig, PurgeConfig, SigningConfig, SigningSecret};
pub use coordinator::{PurgeCoordinator, PurgeError};
pub use durable::{DeleteOutcome, DurableStoreClient, FailureCause, RELEASE_TOKEN_HEADER};
pub use token::{ReleaseClaims, TokenError, TokenIssuer, verify_release_token};
