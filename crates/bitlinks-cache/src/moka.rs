use async_trait::async_trait;
use bitlinks_core::cache::Result;
use bitlinks_core::{CacheRecord, LinkCache, OriginalUrl};
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// An in-memory cache implementation using Moka.
///
/// Bounded and possibly expiring, so it is meant as the L1 in front of a
/// durable store rather than as the store of record.
#[derive(Debug, Clone)]
pub struct MokaLinkCache {
    cache: Cache<OriginalUrl, CacheRecord>,
}

impl MokaLinkCache {
    /// Creates a new Moka cache with default settings.
    ///
    /// The cache will have a default maximum capacity of 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Creates a new Moka cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Creates a new Moka cache whose entries expire `ttl` after insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Creates a new Moka cache whose entries expire after `tti` without access.
    pub fn with_tti(max_capacity: u64, tti: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(tti)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }
}

impl Default for MokaLinkCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    async fn lookup(&self, url: &OriginalUrl) -> Result<Option<CacheRecord>> {
        trace!(url = %url, "looking up record in Moka cache");

        match self.cache.get(url).await {
            Some(record) => {
                debug!(url = %url, "cache hit in Moka");
                Ok(Some(record))
            }
            None => {
                trace!(url = %url, "cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn store(&self, record: CacheRecord) -> Result<CacheRecord> {
        trace!(url = %record.original_url, "storing record in Moka cache");

        let key = record.original_url.clone();
        let entry = self.cache.entry(key).or_insert(record).await;
        if !entry.is_fresh() {
            debug!(url = %entry.key(), "record already cached in Moka, keeping first");
        }
        Ok(entry.into_value())
    }
}

/// Configuration for creating a [`MokaLinkCache`] with custom settings.
#[derive(Debug, TypedBuilder, Default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
    /// Time-to-idle for cache entries.
    #[builder(default, setter(strip_option))]
    tti: Option<Duration>,
}

impl From<CacheConfig> for MokaLinkCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaLinkCache {
            cache: builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitlinks_core::{PerChannel, ShortLink};

    fn url(s: &str) -> OriginalUrl {
        OriginalUrl::new(s)
    }

    fn test_record(s: &str, tag: &str) -> CacheRecord {
        CacheRecord::new(
            url(s),
            PerChannel::from_fn(|channel| ShortLink::new(format!("https://s.io/{tag}/{channel}"))),
        )
    }

    #[tokio::test]
    async fn cache_store_and_lookup() {
        let cache = MokaLinkCache::new();
        let record = test_record("https://example.com", "a");

        assert!(cache.lookup(&record.original_url).await.unwrap().is_none());

        cache.store(record.clone()).await.unwrap();

        let result = cache.lookup(&url("https://example.com")).await.unwrap();
        assert_eq!(result, Some(record));
    }

    #[tokio::test]
    async fn store_keeps_first_record() {
        let cache = MokaLinkCache::with_capacity(10);
        let first = test_record("https://example.com", "first");

        assert_eq!(cache.store(first.clone()).await.unwrap(), first);
        let winner = cache
            .store(test_record("https://example.com", "second"))
            .await
            .unwrap();

        assert_eq!(winner, first);
    }

    #[tokio::test]
    async fn cache_with_ttl_expires() {
        let cache = MokaLinkCache::with_ttl(100, Duration::from_millis(50));
        let record = test_record("https://example.com", "a");

        cache.store(record.clone()).await.unwrap();
        assert!(cache.lookup(&record.original_url).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.lookup(&record.original_url).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cache_builder_pattern() {
        let cache: MokaLinkCache = MokaLinkCache::builder()
            .max_capacity(1000)
            .ttl(Duration::from_secs(60))
            .tti(Duration::from_secs(30))
            .build()
            .into();

        let record = test_record("https://example.com", "a");
        cache.store(record.clone()).await.unwrap();
        assert!(cache.lookup(&record.original_url).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn cache_handles_many_entries() {
        let cache = MokaLinkCache::with_capacity(100);

        for i in 0..50 {
            let record = test_record(&format!("https://example{i}.com"), &i.to_string());
            cache.store(record).await.unwrap();
        }

        let found = cache
            .lookup(&url("https://example25.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.links.vk.as_str(), "https://s.io/25/vk");
    }
}
