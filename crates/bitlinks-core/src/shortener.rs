use crate::error::ShortenerError;
use crate::url::{ShortLink, TaggedUrl};
use async_trait::async_trait;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, ShortenerError>;

/// A link-shortening service.
///
/// One call turns one long URL into one short link. Implementations do not
/// retry.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    async fn shorten(&self, long_url: &TaggedUrl) -> Result<ShortLink>;
}

#[async_trait]
impl<T: Shortener + ?Sized> Shortener for Arc<T> {
    async fn shorten(&self, long_url: &TaggedUrl) -> Result<ShortLink> {
        (**self).shorten(long_url).await
    }
}
