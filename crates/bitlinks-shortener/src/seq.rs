use async_trait::async_trait;
use bitlinks_core::shortener::Result;
use bitlinks_core::{ShortLink, Shortener, TaggedUrl};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// An offline [`Shortener`] that mints sequential links.
///
/// Links look like `{base_url}/{prefix}000000`, `{base_url}/{prefix}000001`
/// and so on. Nothing resolves them; this backend exists so the pipeline can
/// run without credentials for an external service.
///
/// Codes are unique within one instance only. Give each process its own
/// prefix or offset when several share a cache.
#[derive(Debug)]
pub struct SeqShortener {
    counter: AtomicU64,
    prefix: String,
    base_url: String,
}

impl Clone for SeqShortener {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl SeqShortener {
    pub fn new(base_url: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::with_offset(base_url, prefix, 0)
    }

    /// Starts the counter at `offset`, e.g. to resume after a restart.
    pub fn with_offset(base_url: impl Into<String>, prefix: impl Into<String>, offset: u64) -> Self {
        let base_url: String = base_url.into();
        Self {
            counter: AtomicU64::new(offset),
            prefix: prefix.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn next_link(&self) -> ShortLink {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        ShortLink::new(format!("{}/{}{:06}", self.base_url, self.prefix, count))
    }
}

#[async_trait]
impl Shortener for SeqShortener {
    async fn shorten(&self, long_url: &TaggedUrl) -> Result<ShortLink> {
        let link = self.next_link();
        debug!(url = %long_url, link = %link, "minted sequential link");
        Ok(link)
    }
}
