//! Navigation side effects.
//!
//! The guard and the login/logout flows never render anything themselves;
//! they ask a `Navigator` to move the user. `History` is the in-process
//! implementation: it records every location so the terminal front end
//! (and tests) can tell where the user ended up.

use std::sync::{Mutex, PoisonError};

pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &str);
}

#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent location, if any navigation happened.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    /// Every location visited, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Navigator for History {
    fn navigate(&self, to: &str) {
        tracing::debug!(to, "navigate");
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).push(to.to_owned());
    }
}
