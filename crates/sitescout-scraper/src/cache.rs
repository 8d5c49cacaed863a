//! Short-lived in-memory cache of successful scrape results.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sitescout_core::ScrapeResult;

/// Expired entries are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 100;

struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T: Clone> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn get(&self) -> Option<T> {
        if self.is_expired() {
            None
        } else {
            Some(self.value.clone())
        }
    }
}

/// TTL cache keyed by normalised URL and restaurant name.
pub struct ScrapeCache {
    entries: Mutex<HashMap<String, CacheEntry<ScrapeResult>>>,
    ttl: Duration,
}

impl ScrapeCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Cache key for a scrape of `url` on behalf of `restaurant_name`.
    #[must_use]
    pub fn key(url: &str, restaurant_name: Option<&str>) -> String {
        format!("{url}\n{}", restaurant_name.unwrap_or_default())
    }

    /// Returns a clone of the cached result if present and not expired.
    pub fn get(&self, key: &str) -> Option<ScrapeResult> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).and_then(CacheEntry::get)
    }

    /// Stores a result. A zero TTL disables caching.
    pub fn insert(&self, key: String, result: ScrapeResult) {
        if self.ttl.is_zero() {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if entries.len() > PRUNE_THRESHOLD {
            entries.retain(|_, entry| !entry.is_expired());
        }
        entries.insert(key, CacheEntry::new(result, self.ttl));
    }
}
