//! Response cache for the remote meal API.
//!
//! Entries are keyed by the normalised outbound request (endpoint plus query parameter) and
//! hold the raw response body. An entry older than the TTL reads as a miss and is dropped on
//! that read. The cache lives for the lifetime of the process only.
//!
//! Unlike a plain map, the cache can be given a capacity. When a new key would exceed it,
//! expired entries are purged first and then the oldest remaining entry is evicted.
//!
//! Timestamps use `tokio::time::Instant` so tests can drive expiry with a paused clock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// A single cached response body.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub key: String,
    pub payload: String,
    pub stored_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Builds the cache key for a remote request, e.g. `search.php?s=Arrabiata`.
pub fn cache_key(endpoint: &str, param: &str, value: &str) -> String {
    format!("{endpoint}?{param}={value}")
}

#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    capacity: Option<usize>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: Option<usize>) -> Self {
        Self {
            ttl,
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    // A panic while holding the lock cannot leave a half-written entry behind, so a
    // poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the cached payload for `key` if present and younger than the TTL.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl, now) => {
                tracing::debug!(key, "response cache hit");
                Some(entry.payload.clone())
            }
            Some(_) => {
                tracing::debug!(key, "response cache entry expired");
                entries.remove(key);
                None
            }
            None => {
                tracing::debug!(key, "response cache miss");
                None
            }
        }
    }

    /// Stores `payload` under `key`, replacing any previous entry and resetting its age.
    pub fn put(&self, key: impl Into<String>, payload: impl Into<String>) {
        let key = key.into();
        let now = Instant::now();
        let mut entries = self.lock();

        if let Some(capacity) = self.capacity {
            if !entries.contains_key(&key) && entries.len() >= capacity {
                let ttl = self.ttl;
                entries.retain(|_, entry| entry.is_fresh(ttl, now));

                if entries.len() >= capacity {
                    let oldest = entries
                        .values()
                        .min_by_key(|entry| entry.stored_at)
                        .map(|entry| entry.key.clone());
                    if let Some(oldest) = oldest {
                        tracing::debug!(key = %oldest, "evicting oldest response cache entry");
                        entries.remove(&oldest);
                    }
                }
            }
        }

        entries.insert(
            key.clone(),
            CacheEntry {
                key,
                payload: payload.into(),
                stored_at: now,
            },
        );
    }

    /// Drops every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(ttl, now));
        before - entries.len()
    }

    /// Number of physically stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
