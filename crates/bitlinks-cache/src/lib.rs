//! Cache layers for short-link records.
//!
//! Every type here implements [`LinkCache`](bitlinks_core::LinkCache) and can
//! be stacked in front of a durable store with [`LayeredCache`].

pub mod layered;
pub mod moka;
pub mod redis;

pub use self::moka::{CacheConfig, MokaLinkCache};
pub use self::redis::RedisLinkCache;
pub use layered::LayeredCache;
