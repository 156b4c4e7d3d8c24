//! Core types and traits for the bitlinks pipeline.
//!
//! This crate holds the pure parts of the pipeline (query normalization and
//! UTM tag expansion) together with the domain types and the trait seams
//! implemented by the storage, cache and shortener crates.

pub mod cache;
pub mod channel;
pub mod error;
pub mod normalize;
pub mod record;
pub mod shortener;
pub mod tags;
pub mod url;

pub use cache::LinkCache;
pub use channel::{Channel, PerChannel};
pub use error::{CacheError, ShortenerError};
pub use normalize::{MarkerMatching, Normalizer};
pub use record::CacheRecord;
pub use shortener::Shortener;
pub use tags::expand_tags;
pub use url::{CanonicalPrefix, OriginalUrl, ShortLink, TaggedUrl};
