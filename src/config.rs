//! Portal configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://carrerchowk-backend.onrender.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_VERDICT_TTL_SECS: u64 = 0;
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";

pub const BASE_URL_VAR: &str = "CHOWK_BASE_URL";
pub const TOKEN_PATH_VAR: &str = "CHOWK_TOKEN_PATH";
const REQUEST_TIMEOUT_VAR: &str = "CHOWK_REQUEST_TIMEOUT_SECS";
const CONNECT_TIMEOUT_VAR: &str = "CHOWK_CONNECT_TIMEOUT_SECS";
const VERDICT_TTL_VAR: &str = "CHOWK_VERDICT_TTL_SECS";
const LOGIN_PATH_VAR: &str = "CHOWK_LOGIN_PATH";
const DASHBOARD_PATH_VAR: &str = "CHOWK_DASHBOARD_PATH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid { var: &'static str, value: String, reason: &'static str },
    #[error("no data directory available; set CHOWK_TOKEN_PATH")]
    NoTokenPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Where the guard and flows navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub login: String,
    pub dashboard: String,
}

impl Default for Paths {
    fn default() -> Self {
        Self { login: DEFAULT_LOGIN_PATH.to_owned(), dashboard: DEFAULT_DASHBOARD_PATH.to_owned() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub base_url: String,
    pub token_path: PathBuf,
    pub timeouts: Timeouts,
    pub verdict_ttl_secs: u64,
    pub paths: Paths,
}

impl PortalConfig {
    /// Build typed portal config from environment variables.
    ///
    /// Optional:
    /// - `CHOWK_BASE_URL`: API origin, default the hosted backend
    /// - `CHOWK_TOKEN_PATH`: token file, default `<data dir>/chowk/token`
    /// - `CHOWK_REQUEST_TIMEOUT_SECS`: default 10
    /// - `CHOWK_CONNECT_TIMEOUT_SECS`: default 5
    /// - `CHOWK_VERDICT_TTL_SECS`: reuse a valid remote verdict for this long, default 0 (off)
    /// - `CHOWK_LOGIN_PATH`: default `/login`
    /// - `CHOWK_DASHBOARD_PATH`: default `/dashboard`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparseable values or when no token path can be derived.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PortalConfig::from_env`] with a caller-supplied variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparseable values or when no token path can be derived.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = parse_base_url(lookup(BASE_URL_VAR))?;
        let token_path = match lookup(TOKEN_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_token_path().ok_or(ConfigError::NoTokenPath)?,
        };
        let timeouts = Timeouts {
            request_secs: parse_u64(&lookup, REQUEST_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, CONNECT_TIMEOUT_VAR, DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        if timeouts.request_secs == 0 {
            return Err(ConfigError::Invalid {
                var: REQUEST_TIMEOUT_VAR,
                value: "0".into(),
                reason: "must be at least 1 second",
            });
        }
        let verdict_ttl_secs = parse_u64(&lookup, VERDICT_TTL_VAR, DEFAULT_VERDICT_TTL_SECS)?;
        let paths = Paths {
            login: parse_route(lookup(LOGIN_PATH_VAR), LOGIN_PATH_VAR, DEFAULT_LOGIN_PATH)?,
            dashboard: parse_route(lookup(DASHBOARD_PATH_VAR), DASHBOARD_PATH_VAR, DEFAULT_DASHBOARD_PATH)?,
        };

        Ok(Self { base_url, token_path, timeouts, verdict_ttl_secs, paths })
    }
}

/// `<data dir>/chowk/token`, when the platform has a data directory.
#[must_use]
pub fn default_token_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("chowk").join("token"))
}

fn parse_base_url(raw: Option<String>) -> Result<String, ConfigError> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(DEFAULT_BASE_URL.to_owned());
    };
    let trimmed = raw.trim().trim_end_matches('/').to_owned();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid { var: BASE_URL_VAR, value: raw, reason: "expected an http(s) URL" });
    }
    Ok(trimmed)
}

fn parse_u64<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    let parsed = raw.trim().parse::<u64>();
    parsed.map_err(|_| ConfigError::Invalid { var, value: raw, reason: "expected a whole number of seconds" })
}

fn parse_route(raw: Option<String>, var: &'static str, default: &str) -> Result<String, ConfigError> {
    match raw {
        None => Ok(default.to_owned()),
        Some(raw) if raw.starts_with('/') => Ok(raw),
        Some(raw) => Err(ConfigError::Invalid { var, value: raw, reason: "expected a path starting with '/'" }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
