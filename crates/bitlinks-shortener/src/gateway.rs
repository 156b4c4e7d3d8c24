use bitlinks_core::{Channel, PerChannel, ShortLink, Shortener, ShortenerError, TaggedUrl};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// The aggregate fault of one fan-out: the first channel that failed.
#[derive(Debug, Clone, Error)]
#[error("shortening failed for {channel}: {source}")]
pub struct GatewayError {
    pub channel: Channel,
    pub source: ShortenerError,
}

/// Submits one tagged URL per channel to a [`Shortener`], concurrently.
///
/// All three calls run at once. The fan-out succeeds only if every call
/// succeeds; on the first failure the other in-flight calls are dropped and
/// no partial result is returned. Calls are never retried.
#[derive(Debug, Clone)]
pub struct ShorteningGateway<S> {
    shortener: S,
    call_timeout: Duration,
}

impl<S: Shortener> ShorteningGateway<S> {
    pub fn new(shortener: S) -> Self {
        Self::with_timeout(shortener, DEFAULT_CALL_TIMEOUT)
    }

    /// Bounds every single shortening call by `call_timeout`.
    pub fn with_timeout(shortener: S, call_timeout: Duration) -> Self {
        Self {
            shortener,
            call_timeout,
        }
    }

    pub fn shortener(&self) -> &S {
        &self.shortener
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub async fn shorten_all(
        &self,
        urls: &PerChannel<TaggedUrl>,
    ) -> Result<PerChannel<ShortLink>, GatewayError> {
        let (telegram, vk, instagram) = tokio::try_join!(
            self.shorten_one(Channel::Telegram, &urls.telegram),
            self.shorten_one(Channel::Vk, &urls.vk),
            self.shorten_one(Channel::Instagram, &urls.instagram),
        )?;

        Ok(PerChannel {
            telegram,
            vk,
            instagram,
        })
    }

    async fn shorten_one(&self, channel: Channel, url: &TaggedUrl) -> Result<ShortLink, GatewayError> {
        trace!(channel = %channel, url = %url, "submitting variant");

        let result = match tokio::time::timeout(self.call_timeout, self.shortener.shorten(url)).await
        {
            Ok(result) => result,
            Err(_) => Err(ShortenerError::Timeout(format!(
                "no answer within {:?}",
                self.call_timeout
            ))),
        };

        match result {
            Ok(link) => {
                debug!(channel = %channel, link = %link, "variant shortened");
                Ok(link)
            }
            Err(source) => {
                warn!(channel = %channel, error = %source, "shortening call failed");
                Err(GatewayError { channel, source })
            }
        }
    }
}
