//! Durable-store purge client.
//!
//! Issues the `DELETE {base}/state/` call that removes an owner's
//! record, authorized by a deletion token in a dedicated header (kept
//! separate from the general bearer-auth header so the durable store
//! can verify purge authority independently of API identity).
//!
//! The delete is a single fail-fast attempt: the store is idempotent on
//! delete, and the caller decides whether to repeat the whole purge. A
//! 404 means the record is already gone, which is the outcome the purge
//! wanted in the first place.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use scour_retry::http::{FetchOptions, send_resilient};
use scour_types::{PhaseOutcome, PurgeIdentity};
use url::Url;

use crate::config::DurableStoreConfig;

/// Header carrying the minted deletion token.
pub const RELEASE_TOKEN_HEADER: &str = "x-release-token";

/// Why a delete attempt failed. Distinguished for logging only; every
/// cause maps to the same failed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Timeout,
    Transport,
    Status(u16),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Timeout => write!(f, "timeout"),
            FailureCause::Transport => write!(f, "transport"),
            FailureCause::Status(status) => write!(f, "status {status}"),
        }
    }
}

/// Outcome of one durable-store delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The store confirmed the delete (2xx).
    Cleared,
    /// The record was already absent (404).
    AlreadyAbsent,
    /// Transport failure, timeout, or any other non-2xx status.
    Failed { cause: FailureCause },
}

impl DeleteOutcome {
    #[must_use]
    pub fn phase(self) -> PhaseOutcome {
        match self {
            DeleteOutcome::Cleared => PhaseOutcome::Cleared,
            DeleteOutcome::AlreadyAbsent => PhaseOutcome::AlreadyAbsent,
            DeleteOutcome::Failed { .. } => PhaseOutcome::Failed,
        }
    }
}

/// HTTP client for the durable store's purge endpoint.
pub struct DurableStoreClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl DurableStoreClient {
    #[must_use]
    pub fn new(config: &DurableStoreConfig) -> Self {
        let mut endpoint = config.base_url().clone();
        {
            let mut segments = endpoint
                .path_segments_mut()
                .expect("validated http(s) base url always has path segments");
            segments.pop_if_empty().push("state").push("");
        }
        Self {
            http: reqwest::Client::new(),
            endpoint,
            timeout: config.timeout(),
        }
    }

    /// Delete the state record for `identity`, authorized by `token`.
    ///
    /// Never returns an error: every failure mode is folded into
    /// [`DeleteOutcome`] for the coordinator to report.
    pub async fn delete_state(&self, identity: &PurgeIdentity, token: &str) -> DeleteOutcome {
        let options = FetchOptions {
            attempts: 1,
            timeout: self.timeout,
            retry_delay: Duration::ZERO,
        };

        let send = send_resilient(
            || {
                self.http
                    .delete(self.endpoint.clone())
                    .query(&[
                        ("userId", identity.user_id.as_str()),
                        ("businessId", identity.business_id.as_str()),
                        ("grantId", identity.grant_id.as_str()),
                    ])
                    .header(RELEASE_TOKEN_HEADER, token)
            },
            &options,
        )
        .await;

        match send {
            Ok(response) if response.status().is_success() => DeleteOutcome::Cleared,
            Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                DeleteOutcome::AlreadyAbsent
            }
            Ok(response) => DeleteOutcome::Failed {
                cause: FailureCause::Status(response.status().as_u16()),
            },
            Err(failure) => DeleteOutcome::Failed {
                cause: if failure.is_timeout() {
                    FailureCause::Timeout
                } else {
                    FailureCause::Transport
                },
            },
        }
    }
}
