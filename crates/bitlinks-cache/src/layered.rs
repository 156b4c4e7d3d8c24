use async_trait::async_trait;
use bitlinks_core::cache::Result;
use bitlinks_core::{CacheRecord, LinkCache, OriginalUrl};
use tracing::{debug, trace, warn};

/// A two-level cache that composes two [`LinkCache`] implementations.
///
/// L1 is typically a fast, local cache (e.g. [`MokaLinkCache`](crate::MokaLinkCache)),
/// L2 the store of record (the TSV file or Redis).
///
/// # Operation Strategy
///
/// - **Lookup**: try L1 first, then L2. An L2 hit is backfilled into L1; a
///   failed backfill is logged and the L2 record is still returned.
/// - **Store**: write to L2 first; whatever L2 reports as authoritative is
///   then placed into L1, so L1 never holds a record L2 rejected.
#[derive(Debug, Clone)]
pub struct LayeredCache<L1, L2> {
    l1: L1,
    l2: L2,
}

impl<L1, L2> LayeredCache<L1, L2> {
    /// Creates a new layered cache with the given L1 and L2 caches.
    pub fn new(l1: L1, l2: L2) -> Self {
        Self { l1, l2 }
    }

    /// Returns a reference to the L1 cache.
    pub fn l1(&self) -> &L1 {
        &self.l1
    }

    /// Returns a reference to the L2 cache.
    pub fn l2(&self) -> &L2 {
        &self.l2
    }

    /// Consumes the layered cache and returns the inner caches.
    pub fn into_inner(self) -> (L1, L2) {
        (self.l1, self.l2)
    }
}

#[async_trait]
impl<L1, L2> LinkCache for LayeredCache<L1, L2>
where
    L1: LinkCache,
    L2: LinkCache,
{
    async fn lookup(&self, url: &OriginalUrl) -> Result<Option<CacheRecord>> {
        trace!(url = %url, "looking up record in layered cache");

        if let Some(record) = self.l1.lookup(url).await? {
            debug!(url = %url, "L1 cache hit");
            return Ok(Some(record));
        }
        trace!(url = %url, "L1 cache miss, trying L2");

        match self.l2.lookup(url).await? {
            Some(record) => {
                debug!(url = %url, "L2 cache hit, backfilling L1");
                if let Err(e) = self.l1.store(record.clone()).await {
                    warn!(url = %url, error = %e, "failed to backfill L1");
                }
                Ok(Some(record))
            }
            None => {
                trace!(url = %url, "L2 cache miss");
                Ok(None)
            }
        }
    }

    async fn store(&self, record: CacheRecord) -> Result<CacheRecord> {
        trace!(url = %record.original_url, "storing record in layered cache");

        // L2 decides which record wins.
        let authoritative = self.l2.store(record).await?;
        debug!(url = %authoritative.original_url, "stored in L2 cache");

        self.l1.store(authoritative.clone()).await?;
        debug!(url = %authoritative.original_url, "stored in L1 cache");

        Ok(authoritative)
    }
}
