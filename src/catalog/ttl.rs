use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use crate::Result;

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: Option<T>,
    pub expires_at_millis: i64,
}

impl<T> CacheEntry<T> {
    pub fn empty() -> Self {
        Self {
            value: None,
            expires_at_millis: 0,
        }
    }

    pub fn is_fresh(&self, now_millis: i64) -> bool {
        self.value.is_some() && now_millis < self.expires_at_millis
    }
}

/// Single-value cache that expires a fixed time after each refresh.
///
/// The lock only guards reads and writes of the slot, never the upstream
/// fetch, so callers racing on an expired entry may each refresh it. The last
/// writer wins.
pub struct TtlCache<T> {
    name: &'static str,
    entry: Mutex<CacheEntry<T>>,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(name: &'static str, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            entry: Mutex::new(CacheEntry::empty()),
            clock,
        }
    }

    /// The cached value if it has not expired.
    pub fn get(&self) -> Option<T> {
        let now = self.clock.now_millis();
        let entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        if entry.is_fresh(now) {
            entry.value.clone()
        } else {
            None
        }
    }

    /// Return the cached value, or run `fetch` and cache its result for `ttl`.
    /// A failed fetch leaves the previous entry untouched.
    pub async fn get_or_refresh<F, Fut>(&self, ttl: Duration, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get() {
            tracing::debug!("{} cache hit", self.name);
            return Ok(value);
        }

        tracing::debug!("{} cache miss, refreshing", self.name);
        let now = self.clock.now_millis();
        let value = fetch().await?;
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.store(value.clone(), now.saturating_add(ttl_millis));
        Ok(value)
    }

    fn store(&self, value: T, expires_at_millis: i64) {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        *entry = CacheEntry {
            value: Some(value),
            expires_at_millis,
        };
    }
}
