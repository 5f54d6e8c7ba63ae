//! reqwest client for the portal API.
//!
//! Thin HTTP wrapper. Response bodies are parsed by the pure
//! `parse_login_response` so the status/body rules are testable without
//! a server.

use std::time::Duration;

use super::{ApiError, Attestation, Credentials, LOGIN_ENDPOINT, LoginReply, PortalApi, SESSION_CHECK_ENDPOINT};
use crate::config::Timeouts;

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client rooted at `base_url` (no trailing slash needed).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend cannot be initialised.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn send_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() { ApiError::Timeout(e.to_string()) } else { ApiError::Transport(e.to_string()) }
}

#[async_trait::async_trait]
impl PortalApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginReply, ApiError> {
        let response = self
            .http
            .post(self.url(LOGIN_ENDPOINT))
            .json(credentials)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(send_error)?;
        tracing::debug!(status, "login response received");

        parse_login_response(status, &text)
    }

    async fn check_session(&self, token: &str) -> Result<Attestation, ApiError> {
        let response = self
            .http
            .get(self.url(SESSION_CHECK_ENDPOINT))
            .bearer_auth(token)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "session check response received");
        if status.is_success() {
            Ok(Attestation::Accepted)
        } else {
            Ok(Attestation::Rejected { status: status.as_u16() })
        }
    }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

#[derive(serde::Deserialize)]
struct LoginBody {
    token: Option<String>,
    message: Option<String>,
}

/// Map a login status + body to a reply.
///
/// Every body must be a JSON object, whatever the status. Success needs a
/// non-empty `token`; failure carries the `message` when there is one.
pub(crate) fn parse_login_response(status: u16, body: &str) -> Result<LoginReply, ApiError> {
    let parsed: LoginBody = serde_json::from_str(body).map_err(|e| ApiError::UnexpectedBody(e.to_string()))?;

    if (200..300).contains(&status) {
        return match parsed.token {
            Some(token) if !token.trim().is_empty() => Ok(LoginReply::Issued { token }),
            _ => Err(ApiError::MissingToken),
        };
    }

    let message = parsed.message.filter(|m| !m.trim().is_empty());
    Ok(LoginReply::Refused { status, message })
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
