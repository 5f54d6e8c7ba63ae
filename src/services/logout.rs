//! Logout: forget the session and go back to the login page.

use crate::state::AppState;
use crate::store::StoreError;

/// Clear the stored token, then navigate to login. Safe to repeat.
///
/// # Errors
///
/// Returns [`StoreError`] if the token could not be removed; no navigation
/// happens in that case.
pub fn logout(state: &AppState) -> Result<(), StoreError> {
    state.store.clear()?;
    state.verdicts.clear();
    tracing::info!("logged out");
    state.navigator.navigate(&state.paths.login);
    Ok(())
}

#[cfg(test)]
#[path = "logout_test.rs"]
mod tests;
