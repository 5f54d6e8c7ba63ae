//! Remote portal API as seen by the session core.
//!
//! DESIGN
//! ======
//! Only two endpoints matter here: credential exchange and the session
//! check used for remote attestation. Both sit behind the `PortalApi`
//! trait so the validator and login flow can be driven by mocks in tests;
//! `HttpApi` is the reqwest-backed implementation.

pub mod http;

pub use http::HttpApi;

use serde::Serialize;

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const SESSION_CHECK_ENDPOINT: &str = "/api/dashboard";

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Body of `POST /api/auth/login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Outcome of a credential exchange that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginReply {
    /// 2xx with a token in the body.
    Issued { token: String },
    /// Non-2xx; `message` is the server's explanation when it sent one.
    Refused { status: u16, message: Option<String> },
}

/// Outcome of a session check that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attestation {
    Accepted,
    Rejected { status: u16 },
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http client build failed: {0}")]
    HttpClientBuild(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
    #[error("login succeeded without a token")]
    MissingToken,
}

impl ApiError {
    /// Whether the server was never reached (or never answered).
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }
}

// =============================================================================
// API TRAIT
// =============================================================================

/// Remote endpoints used by login and remote attestation. Enables mocking in tests.
#[async_trait::async_trait]
pub trait PortalApi: Send + Sync {
    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the server cannot be reached, answers with
    /// a body that is not JSON, or a success response does not carry a token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginReply, ApiError>;

    /// Ask the server whether it still honors `token`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the server cannot be reached in time.
    async fn check_session(&self, token: &str) -> Result<Attestation, ApiError>;
}
