//! Session validation state machine.
//!
//! ARCHITECTURE
//! ============
//! Runs on every guard activation, in strict order, stopping at the first
//! failure:
//! 1. no stored token            -> `Unauthenticated` (nothing to clear)
//! 2. token does not decode      -> `Unauthenticated`, token cleared
//! 3. `exp <= now`               -> `Expired`, token cleared
//! 4. remote session check
//!    - transport error/timeout  -> `RemoteUnreachable`, token cleared
//!    - non-2xx                  -> `RemoteRejected`, token cleared
//!    - 2xx                      -> `Valid`
//!
//! Unreachable is fail-closed: a network blip logs the user out, same as
//! an explicit rejection.
//!
//! TEARDOWN
//! ========
//! A `MountState` ties one validation to the view that asked for it. If
//! the view is torn down while the remote check is in flight, the result
//! is dropped without touching the store.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::{ApiError, Attestation};
use crate::state::AppState;
use crate::token::{self, Claims};

// =============================================================================
// VERDICT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Unauthenticated,
    Expired,
    RemoteRejected,
    RemoteUnreachable,
    Valid,
}

impl Verdict {
    /// Only `Valid` lets a protected view render.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Expired => "expired",
            Self::RemoteRejected => "rejected by server",
            Self::RemoteUnreachable => "server unreachable",
            Self::Valid => "valid",
        };
        f.write_str(label)
    }
}

// =============================================================================
// MOUNT STATE
// =============================================================================

/// Liveness flag for one guard activation. Clones share the flag.
#[derive(Debug, Clone)]
pub struct MountState {
    mounted: Arc<AtomicBool>,
}

impl MountState {
    #[must_use]
    pub fn new() -> Self {
        Self { mounted: Arc::new(AtomicBool::new(true)) }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl Default for MountState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Validate the stored session for a view that stays mounted throughout.
pub async fn validate(state: &AppState) -> Verdict {
    let mount = MountState::new();
    // A mount nobody else holds cannot be torn down mid-check.
    validate_mounted(state, &mount).await.unwrap_or(Verdict::Unauthenticated)
}

/// Validate the stored session on behalf of `mount`.
///
/// Returns `None` when `mount` was torn down before a verdict could be
/// applied; the store is left untouched in that case.
pub async fn validate_mounted(state: &AppState, mount: &MountState) -> Option<Verdict> {
    if !mount.is_mounted() {
        return None;
    }

    let token = match state.store.get() {
        Ok(Some(token)) => token,
        Ok(None) => {
            tracing::debug!("no session token stored");
            return Some(Verdict::Unauthenticated);
        }
        Err(e) => {
            tracing::warn!(error = %e, "session token unreadable; treating as logged out");
            return Some(Verdict::Unauthenticated);
        }
    };

    let claims = match token::decode(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!(error = %e, "discarding malformed session token");
            discard(state, &token);
            return Some(Verdict::Unauthenticated);
        }
    };

    let now = state.clock.now_secs();
    if claims.is_expired_at(now) {
        tracing::info!(exp = claims.exp, now, "session token expired");
        discard(state, &token);
        return Some(Verdict::Expired);
    }

    if state.verdicts.is_fresh(&token, now) {
        tracing::debug!("session attested recently; skipping remote check");
        return Some(Verdict::Valid);
    }

    let attestation = state.api.check_session(&token).await;
    if !mount.is_mounted() {
        tracing::debug!("guard unmounted before session check resolved; result dropped");
        return None;
    }

    let verdict = verdict_for(&attestation);
    if verdict.is_valid() {
        state.verdicts.remember(&token, state.clock.now_secs());
        tracing::debug!(remaining_secs = claims.remaining_secs(now), "session valid");
    } else {
        log_remote_failure(&attestation);
        discard(state, &token);
    }
    Some(verdict)
}

/// Decode the stored token without any side effects, for display.
#[must_use]
pub fn peek_claims(state: &AppState) -> Option<Claims> {
    let token = state.store.get().ok().flatten()?;
    token::decode(&token).ok()
}

fn verdict_for(attestation: &Result<Attestation, ApiError>) -> Verdict {
    match attestation {
        Ok(Attestation::Accepted) => Verdict::Valid,
        Ok(Attestation::Rejected { .. }) => Verdict::RemoteRejected,
        Err(_) => Verdict::RemoteUnreachable,
    }
}

fn log_remote_failure(attestation: &Result<Attestation, ApiError>) {
    match attestation {
        Ok(Attestation::Rejected { status }) => tracing::info!(status, "server rejected session token"),
        Err(e) => tracing::info!(error = %e, "session check failed; failing closed"),
        Ok(Attestation::Accepted) => {}
    }
}

/// Drop `token` from the store and the verdict cache.
fn discard(state: &AppState, token: &str) {
    state.verdicts.forget(token);
    if let Err(e) = state.store.clear() {
        tracing::warn!(error = %e, "failed to clear session token");
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
