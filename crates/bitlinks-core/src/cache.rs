use crate::error::CacheError;
use crate::record::CacheRecord;
use crate::url::OriginalUrl;
use async_trait::async_trait;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A store of [`CacheRecord`]s keyed by [`OriginalUrl`].
///
/// Implementations range from the durable tab-separated file to in-process
/// and Redis caches; they can be stacked with a layered cache.
#[async_trait]
pub trait LinkCache: Send + Sync + 'static {
    /// Returns the first record stored for `url`.
    ///
    /// Returns `Ok(None)` if the key has never been stored.
    async fn lookup(&self, url: &OriginalUrl) -> Result<Option<CacheRecord>>;

    /// Stores `record` unless a record with the same key already exists.
    ///
    /// Returns the record that is authoritative after the call: `record`
    /// itself when it was inserted, the earlier record otherwise.
    async fn store(&self, record: CacheRecord) -> Result<CacheRecord>;
}

#[async_trait]
impl<T: LinkCache + ?Sized> LinkCache for Arc<T> {
    async fn lookup(&self, url: &OriginalUrl) -> Result<Option<CacheRecord>> {
        (**self).lookup(url).await
    }

    async fn store(&self, record: CacheRecord) -> Result<CacheRecord> {
        (**self).store(record).await
    }
}
