//! Short-lived memo of successful remote attestations.
//!
//! DESIGN
//! ======
//! Keyed by the exact token string, holding the Unix second the entry
//! stops being trusted. Only `Valid` outcomes are remembered; a negative
//! outcome evicts. The local checks (presence, decode, expiry) always run
//! before the cache is consulted, so a cached entry can only ever save a
//! round trip, never admit an expired or malformed token.
//!
//! A zero TTL disables the cache entirely: every guard activation makes
//! its own remote check.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone)]
pub struct VerdictCache {
    ttl_secs: u64,
    entries: Arc<Mutex<HashMap<String, i64>>>,
}

impl VerdictCache {
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self { ttl_secs, entries: Arc::new(Mutex::new(HashMap::new())) }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.ttl_secs > 0
    }

    /// Whether `token` was attested within the TTL as of `now_secs`.
    #[must_use]
    pub fn is_fresh(&self, token: &str, now_secs: i64) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(token).is_some_and(|&until| now_secs < until)
    }

    /// Record a successful attestation made at `now_secs`.
    pub fn remember(&self, token: &str, now_secs: i64) {
        if !self.is_enabled() {
            return;
        }
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, &mut until| now_secs < until);
        entries.insert(token.to_owned(), now_secs.saturating_add(ttl));
    }

    pub fn forget(&self, token: &str) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(token);
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "verdict_cache_test.rs"]
mod tests;
