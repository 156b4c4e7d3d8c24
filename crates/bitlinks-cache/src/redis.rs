use async_trait::async_trait;
use bitlinks_core::cache::Result;
use bitlinks_core::{CacheError, CacheRecord, LinkCache, OriginalUrl};
use redis::AsyncCommands;
use tracing::{debug, trace, warn};

const DEFAULT_KEY_PREFIX: &str = "bitlinks:record:";

/// A Redis-based implementation of [`LinkCache`].
///
/// Records are stored as JSON strings under a configurable key prefix.
/// `store` uses `SETNX`, so Redis itself decides the first write when several
/// processes race on one key.
#[derive(Clone)]
pub struct RedisLinkCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

impl std::fmt::Debug for RedisLinkCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisLinkCache")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        CacheError::Timeout(message)
    } else {
        CacheError::Operation(message)
    }
}

fn cache_key(prefix: &str, url: &OriginalUrl) -> String {
    format!("{}{}", prefix, url.as_str())
}

impl RedisLinkCache {
    /// Creates a new Redis link cache over an existing connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    /// Creates a new Redis link cache with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Opens a multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Initialization(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Initialization(format!("failed to connect to redis: {e}")))?;
        Ok(Self::new(conn))
    }

    async fn get_record(&self, key: &str) -> Result<Option<CacheRecord>> {
        let mut conn = self.conn.clone();
        let cached = conn
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| map_redis_error("failed to fetch value from Redis", e))?;

        cached
            .map(|json| {
                serde_json::from_str::<CacheRecord>(&json).map_err(|e| {
                    CacheError::InvalidData(format!("invalid cached value for key '{key}': {e}"))
                })
            })
            .transpose()
    }
}

#[async_trait]
impl LinkCache for RedisLinkCache {
    async fn lookup(&self, url: &OriginalUrl) -> Result<Option<CacheRecord>> {
        let key = cache_key(&self.key_prefix, url);
        trace!(url = %url, "looking up record in Redis");

        match self.get_record(&key).await {
            Ok(Some(record)) => {
                debug!(url = %url, "cache hit in Redis");
                Ok(Some(record))
            }
            Ok(None) => {
                trace!(url = %url, "cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Redis lookup failed");
                Err(e)
            }
        }
    }

    async fn store(&self, record: CacheRecord) -> Result<CacheRecord> {
        let key = cache_key(&self.key_prefix, &record.original_url);
        trace!(url = %record.original_url, "storing record in Redis");

        let json = serde_json::to_string(&record).map_err(|e| {
            warn!(url = %record.original_url, error = %e, "failed to serialize record");
            CacheError::Serialization(format!("failed to serialize cache value: {e}"))
        })?;

        let mut conn = self.conn.clone();
        let inserted = conn
            .set_nx::<_, _, bool>(&key, json)
            .await
            .map_err(|e| {
                warn!(url = %record.original_url, error = %e, "failed to write record to Redis");
                map_redis_error("failed to write value to Redis", e)
            })?;

        if inserted {
            debug!(url = %record.original_url, "cached record in Redis");
            return Ok(record);
        }

        debug!(url = %record.original_url, "record already in Redis, keeping first");
        Ok(self.get_record(&key).await?.unwrap_or(record))
    }
}
