//! Credential submission.
//!
//! On success the returned token replaces whatever was stored and the user
//! is sent to the dashboard. On failure the store is left alone and the
//! caller gets a message meant for the user: the server's own text when it
//! sent one, a generic fallback otherwise.
//!
//! Submissions are not deduplicated. `is_submitting` is what a front end
//! uses to disable its submit control while a request is outstanding.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{ApiError, Credentials, LoginReply};
use crate::state::AppState;
use crate::store::StoreError;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const UNAVAILABLE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Email and password are required")]
    Incomplete,
    #[error("{message}")]
    Rejected { message: String },
    #[error("Something went wrong. Please try again.")]
    Unavailable(#[source] ApiError),
    #[error("Could not save the session: {0}")]
    Store(#[from] StoreError),
}

/// Counts one outstanding submission for as long as it lives.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Whether any login submission is awaiting the server.
#[must_use]
pub fn is_submitting(state: &AppState) -> bool {
    state.logins_in_flight.load(Ordering::SeqCst) > 0
}

/// Exchange credentials for a session token and enter the dashboard.
///
/// # Errors
///
/// Returns [`LoginError`] when a field is empty, the server refuses the
/// credentials, the server cannot be reached, or the token cannot be stored.
/// The token store is never modified on error.
pub async fn submit(state: &AppState, credentials: &Credentials) -> Result<(), LoginError> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(LoginError::Incomplete);
    }

    let reply = {
        let _in_flight = InFlight::enter(&state.logins_in_flight);
        state.api.login(credentials).await
    };

    let token = match reply {
        Ok(LoginReply::Issued { token }) => token,
        Ok(LoginReply::Refused { status, message }) => {
            tracing::info!(status, "login refused");
            let message = message.unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_owned());
            return Err(LoginError::Rejected { message });
        }
        Err(ApiError::MissingToken) => {
            tracing::warn!("login response carried no token");
            return Err(LoginError::Rejected { message: LOGIN_FAILED_MESSAGE.to_owned() });
        }
        Err(e) => {
            tracing::warn!(error = %e, "login request failed");
            return Err(LoginError::Unavailable(e));
        }
    };

    state.store.set(&token)?;
    state.verdicts.clear();
    tracing::info!("login succeeded");
    state.navigator.navigate(&state.paths.dashboard);
    Ok(())
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
