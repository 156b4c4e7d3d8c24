use crate::channel::PerChannel;
use crate::url::{OriginalUrl, ShortLink};
use serde::{Deserialize, Serialize};

/// The stored association between an original URL and its three short links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The URL as originally submitted; the cache key.
    pub original_url: OriginalUrl,
    /// One short link per channel.
    pub links: PerChannel<ShortLink>,
}

impl CacheRecord {
    pub fn new(original_url: OriginalUrl, links: PerChannel<ShortLink>) -> Self {
        Self {
            original_url,
            links,
        }
    }
}
