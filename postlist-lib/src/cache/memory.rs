//! In-memory cache implementation using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::CacheProvider;
use super::CachedValue;

/// An in-memory cache backed by a concurrent hash map.
///
/// # Example
///
/// ```
/// use postlist_lib::cache::InMemoryCache;
///
/// let cache = InMemoryCache::new();
/// assert!(cache.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCache {
    store: DashMap<String, CachedValue>,
}

impl InMemoryCache {
    /// Creates a new empty in-memory cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl CacheProvider for InMemoryCache {
    async fn get(&self, key: &str) -> Option<CachedValue> {
        let entry = self.store.get(key)?;
        let value = entry.value();

        if value.is_expired() {
            drop(entry);
            self.store.remove(key);
            None
        } else {
            Some(value.clone())
        }
    }

    async fn set(&self, key: &str, value: CachedValue) {
        self.store.insert(key.to_string(), value);
    }

    async fn remove_prefix(&self, prefix: &str) -> usize {
        let before = self.store.len();
        self.store.retain(|key, _| !key.starts_with(prefix));
        before - self.store.len()
    }

    async fn clear(&self) {
        self.store.clear();
    }

    async fn gc(&self) -> usize {
        let mut removed = 0;
        self.store.retain(|_, value| {
            if value.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_remove_prefix() {
        let cache = InMemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("posts:1", CachedValue::with_ttl(vec![1], ttl)).await;
        cache.set("posts:2", CachedValue::with_ttl(vec![2], ttl)).await;
        cache.set("users:1", CachedValue::with_ttl(vec![3], ttl)).await;

        assert_eq!(cache.remove_prefix("posts:").await, 2);
        assert!(cache.get("posts:1").await.is_none());
        assert_eq!(cache.get("users:1").await.map(|v| v.data), Some(vec![3]));
    }

    #[tokio::test]
    async fn test_expired_entries() {
        let cache = InMemoryCache::new();
        cache.set("a", CachedValue::with_ttl(vec![1], Duration::ZERO)).await;
        cache.set("b", CachedValue::with_ttl(vec![2], Duration::ZERO)).await;
        assert_eq!(cache.gc().await, 2);

        cache.set("c", CachedValue::with_ttl(vec![3], Duration::ZERO)).await;
        assert!(cache.get("c").await.is_none());
        assert!(cache.is_empty());
    }
}
