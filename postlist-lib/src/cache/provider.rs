//! Data provider wrapper that caches list pages

use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use super::CacheConfig;
use super::CacheProvider;
use super::CachedValue;
use super::InMemoryCache;
use crate::api::DataProvider;
use crate::api::Invalidation;
use crate::api::InvalidationBus;
use crate::api::query::ListParams;
use crate::api::query::Page;
use crate::error::ProviderError;
use crate::model::Post;
use crate::model::PostId;
use crate::model::PostUpdate;

/// Wraps a provider and serves repeated `list` calls from a cache.
///
/// Invalidations published by the inner provider drop the resource's cached
/// pages and are re-published to this wrapper's own subscribers, so a
/// mutation always reaches subscribers after the stale pages are gone.
///
/// Each drop bumps the resource's generation. A page read while the
/// generation moved is returned but never cached.
///
/// # Example
///
/// ```
/// use postlist_lib::api::InMemoryProvider;
/// use postlist_lib::cache::{CacheConfig, CachedProvider};
///
/// let provider = CachedProvider::new(InMemoryProvider::new("posts"), CacheConfig::default());
/// ```
#[derive(Debug)]
pub struct CachedProvider<P, C = InMemoryCache> {
    inner: P,
    cache: C,
    config: CacheConfig,
    inner_rx: Mutex<broadcast::Receiver<Invalidation>>,
    bus: InvalidationBus,
    generations: DashMap<String, u64>,
    /// Bumped when the whole cache is cleared.
    epoch: AtomicU64,
}

impl<P: DataProvider> CachedProvider<P, InMemoryCache> {
    /// Wraps `inner` with an in-memory cache.
    pub fn new(inner: P, config: CacheConfig) -> Self {
        Self::with_cache(inner, InMemoryCache::new(), config)
    }
}

impl<P: DataProvider, C: CacheProvider> CachedProvider<P, C> {
    /// Wraps `inner` with the given cache.
    pub fn with_cache(inner: P, cache: C, config: CacheConfig) -> Self {
        let inner_rx = Mutex::new(inner.subscribe());
        Self {
            inner,
            cache,
            config,
            inner_rx,
            bus: InvalidationBus::default(),
            generations: DashMap::new(),
            epoch: AtomicU64::new(0),
        }
    }

    /// Returns the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Returns the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    fn cache_key(resource: &str, params: &ListParams) -> Result<String, ProviderError> {
        let params = serde_json::to_string(params).map_err(|e| ProviderError::Cache(e.to_string()))?;
        Ok(format!("{}:{}", resource, params))
    }

    /// Takes the inner provider's pending notices.
    ///
    /// Returns the resources to drop, or `None` if notices were lost and the
    /// whole cache must go.
    fn take_inner_invalidations(&self) -> Option<Vec<String>> {
        let Ok(mut rx) = self.inner_rx.lock() else {
            return None;
        };
        let mut resources = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(notice) => {
                    if !resources.contains(&notice.resource) {
                        resources.push(notice.resource);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Some(resources),
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!("Missed {} invalidations, clearing page cache", skipped);
                    return None;
                }
            }
        }
    }

    fn generation(&self, resource: &str) -> (u64, u64) {
        let resource_generation = self.generations.get(resource).map(|g| *g).unwrap_or(0);
        (self.epoch.load(Ordering::Acquire), resource_generation)
    }

    async fn sync_invalidations(&self) {
        match self.take_inner_invalidations() {
            Some(resources) => {
                for resource in resources {
                    *self.generations.entry(resource.clone()).or_insert(0) += 1;
                    let removed = self.cache.remove_prefix(&format!("{}:", resource)).await;
                    log::debug!("Dropped {} cached pages of '{}'", removed, resource);
                    self.bus.publish(&resource);
                }
            }
            None => {
                self.epoch.fetch_add(1, Ordering::AcqRel);
                self.cache.clear().await
            }
        }
    }
}

#[async_trait]
impl<P: DataProvider, C: CacheProvider> DataProvider for CachedProvider<P, C> {
    async fn list(&self, resource: &str, params: &ListParams) -> Result<Page, ProviderError> {
        self.sync_invalidations().await;

        if !self.config.is_enabled() {
            return self.inner.list(resource, params).await;
        }

        let key = Self::cache_key(resource, params)?;
        if let Some(cached) = self.cache.get(&key).await {
            match bincode::deserialize::<Page>(&cached.data) {
                Ok(page) => {
                    log::trace!("Cache hit for {}", key);
                    return Ok(page);
                }
                Err(e) => log::warn!("Discarding unreadable cache entry {}: {}", key, e),
            }
        }

        let generation = self.generation(resource);
        let page = self.inner.list(resource, params).await?;

        // A change that landed during the read may not be in the page.
        self.sync_invalidations().await;
        if self.generation(resource) != generation {
            log::debug!("Not caching {}, '{}' changed during the read", key, resource);
            return Ok(page);
        }

        match bincode::serialize(&page) {
            Ok(data) => {
                let expired = self.cache.gc().await;
                if expired > 0 {
                    log::trace!("Evicted {} expired pages", expired);
                }
                self.cache
                    .set(&key, CachedValue::with_ttl(data, self.config.list_ttl))
                    .await
            }
            Err(e) => log::warn!("Could not cache page {}: {}", key, e),
        }
        Ok(page)
    }

    async fn update(&self, resource: &str, id: PostId, fields: &PostUpdate) -> Result<Post, ProviderError> {
        let result = self.inner.update(resource, id, fields).await;
        self.sync_invalidations().await;
        result
    }

    async fn delete_many(&self, resource: &str, ids: &[PostId]) -> Result<(), ProviderError> {
        let result = self.inner.delete_many(resource, ids).await;
        self.sync_invalidations().await;
        result
    }

    fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.bus.subscribe()
    }
}
