// src/services/cache.rs
// DOCUMENTATION: Generic in-memory TTL cache for remote API responses
// PURPOSE: Reduce paid API calls by caching geocode/search/details results

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Default TTL applied by TtlCache::default_ttl()
pub const DEFAULT_TTL_SECONDS: u64 = 600;

/// Cache entry with absolute expiry
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Generic in-memory cache with TTL
/// DOCUMENTATION: Thread-safe; one instance per data category (geocode,
/// search, details) so pressure in one category cannot evict another's
/// entries
pub struct TtlCache<T: Clone> {
    store: Arc<RwLock<HashMap<String, CacheEntry<T>>>>,
    default_ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    /// Create new cache with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    pub fn default_ttl() -> Self {
        Self::new(DEFAULT_TTL_SECONDS)
    }

    /// Get cached value
    /// DOCUMENTATION: Lazily evicts the entry when it has expired; a live
    /// read never extends the TTL
    pub async fn get(&self, key: &str) -> Option<T> {
        {
            let store = self.store.read().await;
            match store.get(key) {
                Some(entry) if !entry.is_expired() => {
                    log::debug!("Cache HIT for key: {}", key);
                    return Some(entry.data.clone());
                }
                Some(_) => log::debug!("Cache EXPIRED for key: {}", key),
                None => {
                    log::debug!("Cache MISS for key: {}", key);
                    return None;
                }
            }
        }

        // Expired: drop the stale entry under the write lock
        let mut store = self.store.write().await;
        if store.get(key).map(|e| e.is_expired()).unwrap_or(false) {
            store.remove(key);
        }
        None
    }

    /// Set cached value with default TTL (overwrites unconditionally)
    pub async fn set(&self, key: String, value: T) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Set cached value with custom TTL
    pub async fn set_with_ttl(&self, key: String, value: T, ttl: Duration) {
        let mut store = self.store.write().await;
        store.insert(key.clone(), CacheEntry::new(value, ttl));
        log::debug!("Cache SET for key: {} (TTL: {}s)", key, ttl.as_secs());
    }

    /// Remove all currently-expired entries, returning how many were dropped
    /// DOCUMENTATION: Housekeeping only - never called automatically
    pub async fn prune(&self) -> usize {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let removed = before_count - store.len();

        if removed > 0 {
            log::info!(
                "Cache prune: removed {} expired entries ({} remaining)",
                removed,
                store.len()
            );
        }

        removed
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }

    /// Clear all cache entries
    pub async fn clear(&self) {
        let mut store = self.store.write().await;
        let count = store.len();
        store.clear();
        log::info!("Cache cleared: {} entries removed", count);
    }
}

/// Generate a cache key from named parameters
/// DOCUMENTATION: Pairs are sorted alphabetically by name so parameter
/// order never affects key identity
pub fn generate_key(prefix: &str, params: &[(&str, String)]) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);

    let serialized: Vec<String> = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();

    format!("{}:{}", prefix, serialized.join("&"))
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache: TtlCache<String> = TtlCache::new(60);

        cache.set("k".to_string(), "v".to_string()).await;

        assert_eq!(cache.get("k").await, Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_cache_expiration_evicts_entry() {
        let cache: TtlCache<String> = TtlCache::new(60);
        cache
            .set_with_ttl("k".to_string(), "v".to_string(), Duration::from_millis(20))
            .await;

        assert!(cache.get("k").await.is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(cache.get("k").await.is_none());

        // The expired read evicted the entry
        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 0);
    }

    #[tokio::test]
    async fn test_cache_overwrite() {
        let cache: TtlCache<i32> = TtlCache::new(60);

        cache.set("k".to_string(), 1).await;
        cache.set("k".to_string(), 2).await;

        assert_eq!(cache.get("k").await, Some(2));
    }

    #[test]
    fn test_generate_key_is_order_independent() {
        let key1 = generate_key(
            "search",
            &[("a", "1".to_string()), ("b", "2".to_string())],
        );
        let key2 = generate_key(
            "search",
            &[("b", "2".to_string()), ("a", "1".to_string())],
        );

        assert_eq!(key1, key2);
    }

    #[test]
    fn test_generate_key_distinguishes_values() {
        let key1 = generate_key("geocode", &[("address", "HSR Layout".to_string())]);
        let key2 = generate_key("geocode", &[("address", "Indiranagar".to_string())]);

        assert_ne!(key1, key2);
    }

    #[tokio::test]
    async fn test_prune_counts_expired() {
        let cache: TtlCache<String> = TtlCache::new(60);

        cache
            .set_with_ttl("a".to_string(), "1".to_string(), Duration::from_millis(10))
            .await;
        cache
            .set_with_ttl("b".to_string(), "2".to_string(), Duration::from_millis(10))
            .await;
        cache.set("c".to_string(), "3".to_string()).await;

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.prune().await, 2);

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.active_entries, 1);
    }
}
