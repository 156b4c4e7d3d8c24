use async_trait::async_trait;
use bitlinks_core::cache::Result;
use bitlinks_core::{CacheRecord, LinkCache, OriginalUrl};
use dashmap::DashMap;
use tracing::{debug, trace};

/// In-memory implementation of [`LinkCache`] using DashMap.
///
/// Records live as long as the process. `store` goes through the entry API,
/// so concurrent writers for one key always agree on the first record.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    storage: DashMap<OriginalUrl, CacheRecord>,
}

impl InMemoryLinkStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates an empty in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl LinkCache for InMemoryLinkStore {
    async fn lookup(&self, url: &OriginalUrl) -> Result<Option<CacheRecord>> {
        trace!(url = %url, "looking up record in memory store");
        Ok(self.storage.get(url).map(|entry| entry.value().clone()))
    }

    async fn store(&self, record: CacheRecord) -> Result<CacheRecord> {
        let url = record.original_url.clone();
        let stored = self.storage.entry(url).or_insert(record).value().clone();
        debug!(url = %stored.original_url, "stored record in memory store");
        Ok(stored)
    }
}
