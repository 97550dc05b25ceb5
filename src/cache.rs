//! TTL caches for quotes and the aggregate price list
//!
//! Entries are replaced wholesale on refresh, never partially merged. Uses
//! `tokio::time::Instant` so staleness follows the runtime clock.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// A cached value and the moment it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        CacheEntry {
            value,
            fetched_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Keyed TTL cache. A stale entry is treated as absent; it is overwritten by
/// the next `put` for its key.
pub struct TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    ttl: Duration,
    inner: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let cache = self.inner.lock().await;
        match cache.get(key) {
            Some(entry) if entry.is_fresh(self.ttl) => {
                debug!("Cache HIT");
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Cache STALE");
                None
            }
            None => {
                debug!("Cache MISS");
                None
            }
        }
    }

    pub async fn put(&self, key: K, value: V) {
        let mut cache = self.inner.lock().await;
        debug!("Cache PUT");
        cache.insert(key, CacheEntry::new(value));
    }
}

/// Single-slot TTL cache, used for the aggregate price list.
pub struct TtlCell<V>
where
    V: Clone + Send + Sync + 'static,
{
    ttl: Duration,
    inner: Mutex<Option<CacheEntry<V>>>,
}

impl<V> TtlCell<V>
where
    V: Clone + Send + Sync,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCell {
            ttl,
            inner: Mutex::new(None),
        }
    }

    pub async fn get(&self) -> Option<V> {
        let cell = self.inner.lock().await;
        cell.as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.value.clone())
    }

    pub async fn put(&self, value: V) {
        let mut cell = self.inner.lock().await;
        *cell = Some(CacheEntry::new(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_cache_serves_fresh_entry() {
        let cache = TtlCache::<String, i32>::new(Duration::from_millis(5000));

        assert!(cache.get(&"key1".to_string()).await.is_none());

        cache.put("key1".to_string(), 123).await;
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));

        advance(Duration::from_millis(4999)).await;
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_expires_after_ttl() {
        let cache = TtlCache::<String, i32>::new(Duration::from_millis(5000));

        cache.put("key1".to_string(), 123).await;
        advance(Duration::from_millis(5000)).await;

        assert!(cache.get(&"key1".to_string()).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_put_replaces_entry_wholesale() {
        let cache = TtlCache::<String, i32>::new(Duration::from_millis(5000));

        cache.put("key1".to_string(), 1).await;
        advance(Duration::from_millis(4000)).await;
        cache.put("key1".to_string(), 2).await;

        // Replacement restarts the entry's clock.
        advance(Duration::from_millis(4000)).await;
        assert_eq!(cache.get(&"key1".to_string()).await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cell_expires_after_ttl() {
        let cell = TtlCell::<Vec<i32>>::new(Duration::from_millis(10_000));

        assert!(cell.get().await.is_none());

        cell.put(vec![1, 2, 3]).await;
        assert_eq!(cell.get().await, Some(vec![1, 2, 3]));

        advance(Duration::from_millis(10_000)).await;
        assert!(cell.get().await.is_none());
    }
}
