//! Short-lived in-memory cache for collections read from the store.

use std::time::{Duration, Instant};

/// Default time a cached collection stays valid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// How a read should treat the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Serve from cache while it is fresh.
    Cached,
    /// Always hit the store. Required right after writes that the caller
    /// is about to act on.
    Fresh,
}

/// Cache slot for one collection.
#[derive(Debug, Clone)]
pub struct CollectionCache<T> {
    ttl: Duration,
    entry: Option<(Instant, T)>,
}

impl<T: Clone> CollectionCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value if it is younger than the TTL at `now`.
    pub fn get_at(&self, now: Instant) -> Option<T> {
        match &self.entry {
            Some((stored_at, value)) if now.saturating_duration_since(*stored_at) < self.ttl => {
                Some(value.clone())
            }
            _ => None,
        }
    }

    pub fn get(&self) -> Option<T> {
        self.get_at(Instant::now())
    }

    pub fn put_at(&mut self, value: T, now: Instant) {
        self.entry = Some((now, value));
    }

    pub fn put(&mut self, value: T) {
        self.put_at(value, Instant::now());
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

impl<T: Clone> Default for CollectionCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
