//! Route guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route is wrapped by the same guard so they all apply
//! identical redirect behavior. The guard runs the full session validation
//! on each activation; there is no verdict shared between guards beyond
//! the opt-in verdict cache.

use crate::services::session::{self, Verdict};
use crate::state::AppState;

pub use crate::services::session::MountState;

/// What a guard activation produced.
#[derive(Debug, PartialEq, Eq)]
pub enum GuardOutcome<V> {
    /// Session valid; the protected view was rendered.
    Render(V),
    /// Session not valid; the user was sent to `to`.
    Redirect { to: String, verdict: Verdict },
    /// The mount went away before a verdict landed; nothing happened.
    Discarded,
}

impl<V> GuardOutcome<V> {
    #[must_use]
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render(_))
    }
}

/// Activate the guard around a protected view.
///
/// `render` is only called on a `Valid` verdict, so nothing protected is
/// produced for a session that turns out to be invalid.
pub async fn activate<V, F>(state: &AppState, mount: &MountState, render: F) -> GuardOutcome<V>
where
    F: FnOnce() -> V,
{
    let Some(verdict) = session::validate_mounted(state, mount).await else {
        return GuardOutcome::Discarded;
    };

    if verdict.is_valid() {
        return GuardOutcome::Render(render());
    }

    let to = state.paths.login.clone();
    tracing::info!(%verdict, to = %to, "protected route denied; redirecting");
    state.navigator.navigate(&to);
    GuardOutcome::Redirect { to, verdict }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
