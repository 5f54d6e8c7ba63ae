//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` bundles every collaborator the guard and the login/logout
//! flows touch: token store, remote API, clock, navigator, verdict cache
//! and the configured paths. Each is held behind an `Arc<dyn _>` so tests
//! swap in fakes and front ends bring their own persistence/navigation.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::api::{ApiError, HttpApi, PortalApi};
use crate::config::{Paths, PortalConfig};
use crate::nav::Navigator;
use crate::services::verdict_cache::VerdictCache;
use crate::store::{FileTokenStore, TokenStore};

// =============================================================================
// CLOCK
// =============================================================================

/// Source of "now" in Unix seconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
            return 0;
        };
        i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
    }
}

// =============================================================================
// APP STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TokenStore>,
    pub api: Arc<dyn PortalApi>,
    pub clock: Arc<dyn Clock>,
    pub navigator: Arc<dyn Navigator>,
    pub verdicts: VerdictCache,
    pub paths: Paths,
    /// Login submissions currently awaiting the server.
    pub(crate) logins_in_flight: Arc<AtomicUsize>,
}

impl AppState {
    /// State with the system clock, default paths and verdict caching off.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, api: Arc<dyn PortalApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            api,
            clock: Arc::new(SystemClock),
            navigator,
            verdicts: VerdictCache::disabled(),
            paths: Paths::default(),
            logins_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// File-backed store and HTTP API as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &PortalConfig, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let store = Arc::new(FileTokenStore::new(&config.token_path));
        let api = Arc::new(HttpApi::new(&config.base_url, config.timeouts)?);
        Ok(Self::new(store, api, navigator)
            .with_verdict_ttl(config.verdict_ttl_secs)
            .with_paths(config.paths.clone()))
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_verdict_ttl(mut self, ttl_secs: u64) -> Self {
        self.verdicts = VerdictCache::new(ttl_secs);
        self
    }

    #[must_use]
    pub fn with_paths(mut self, paths: Paths) -> Self {
        self.paths = paths;
        self
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
