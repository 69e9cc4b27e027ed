//! Caching layer for price history to reduce API calls

use cached::{Cached, TimedCache};
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for a price history request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Stock symbol
    pub symbol: String,
    /// First day requested
    pub start: NaiveDate,
    /// Last day requested
    pub end: NaiveDate,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..={}]", self.symbol, self.start, self.end)
    }
}

/// Thread-safe, time-bounded cache
pub struct StockCache<V> {
    cache: Arc<RwLock<TimedCache<CacheKey, V>>>,
}

impl<V: Clone> StockCache<V> {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        // TimedCache evicts expired entries on read, so this needs the write lock
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache.
    ///
    /// Expired entries are dropped first; keys move with the calendar, so an
    /// expired key is usually never read again.
    pub async fn insert(&self, key: CacheKey, value: V) {
        let mut cache = self.cache.write().await;
        cache.flush();
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If the value exists in cache, it's returned immediately.
    /// Otherwise, the fetcher function is called and a successful result is cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetcher: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(%key, "Cache hit");
            return Ok(value);
        }

        tracing::debug!(%key, "Cache miss");

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V> Clone for StockCache<V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}
