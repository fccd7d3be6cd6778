use std::sync::Arc;
use std::time::{Duration, Instant};
use dashmap::DashMap;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    stored_at: Instant,
    value: V,
}

/// Short-lived, thread-safe response cache.
///
/// Absorbs duplicate polls of the same market data from several open
/// clients. A TTL of zero disables it: nothing is stored and every lookup
/// misses.
#[derive(Clone)]
pub struct MarketCache<V> {
    entries: Arc<DashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> MarketCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Cached value for `key` if it is younger than the TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        if !self.is_enabled() {
            return None;
        }

        if let Some(entry) = self.entries.get(key) {
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.value.clone());
            }
        }
        self.evict_if_stale(key);
        None
    }

    // A concurrent poll may have refreshed the entry since it was read
    fn evict_if_stale(&self, key: &str) {
        let ttl = self.ttl;
        self.entries
            .remove_if(key, |_, entry| entry.stored_at.elapsed() >= ttl);
    }

    pub fn insert(&self, key: String, value: V) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Drop every expired entry.
    pub fn cleanup_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Key for a set of tickers, independent of order and repetition.
pub fn ticker_set_key(tickers: &[String]) -> String {
    let mut sorted: Vec<&str> = tickers.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join(",")
}
