use std::sync::Arc;

use crate::cache::CacheStore;

/// Cache key for the unlocked flag
const AUTH_KEY: &str = "authenticated";

/// Locally persisted gate state. Unlocking is a device-local fact; the
/// backend only ever sees the password hash.
#[derive(Clone)]
pub struct Session {
    cache: Arc<CacheStore>,
}

impl Session {
    pub(crate) fn new(cache: Arc<CacheStore>) -> Self {
        Self { cache }
    }

    pub fn is_authenticated(&self) -> bool {
        self.cache.get_flag(AUTH_KEY)
    }

    pub fn set_authenticated(&self, value: bool) {
        self.cache.set_flag(AUTH_KEY, value);
    }

    pub fn logout(&self) {
        self.cache.remove(AUTH_KEY);
    }
}
