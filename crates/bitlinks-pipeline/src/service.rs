use std::sync::Arc;

use async_trait::async_trait;
use bitlinks_core::{
    expand_tags, CacheRecord, LinkCache, Normalizer, OriginalUrl, PerChannel, ShortLink,
    Shortener,
};
use bitlinks_shortener::ShorteningGateway;
use tracing::{debug, info, trace, warn};

use crate::error::{PipelineError, Result};
use crate::validator::{check_input, Probe, Validator};

#[async_trait]
pub trait Bitlinks: Send + Sync + 'static {
    /// Returns the three campaign-tagged short links for `url`, from the
    /// cache when possible.
    async fn bitlinks(&self, url: &str) -> Result<CacheRecord>;
}

/// Where one run currently is.
#[derive(Debug)]
enum RunState {
    CacheCheck,
    Validating,
    Shortening,
    Cached(PerChannel<ShortLink>),
    Served(CacheRecord),
}

/// Runs the whole pipeline for one URL.
///
/// A cache hit is served as-is with no validation or shortening. On a miss the
/// URL is validated, normalized, expanded into three tagged variants and
/// shortened; the record is written only after all three links exist.
///
/// Runs are independent: the service holds no lock across requests, and the
/// cache's insert-if-absent `store` makes concurrent misses on one URL
/// converge on a single record.
#[derive(Debug)]
pub struct BitlinksService<C, S, P> {
    cache: Arc<C>,
    validator: Validator<P>,
    normalizer: Normalizer,
    gateway: ShorteningGateway<S>,
}

impl<C, S, P> BitlinksService<C, S, P>
where
    C: LinkCache,
    S: Shortener,
    P: Probe,
{
    pub fn new(
        cache: C,
        validator: Validator<P>,
        normalizer: Normalizer,
        gateway: ShorteningGateway<S>,
    ) -> Self {
        Self {
            cache: Arc::new(cache),
            validator,
            normalizer,
            gateway,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    async fn step(&self, url: &OriginalUrl, state: RunState) -> Result<RunState> {
        match state {
            RunState::CacheCheck => match self.cache.lookup(url).await {
                Ok(Some(record)) => {
                    debug!(url = %url, "cache hit");
                    Ok(RunState::Served(record))
                }
                Ok(None) => {
                    trace!(url = %url, "cache miss");
                    Ok(RunState::Validating)
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "cache lookup failed");
                    Err(e.into())
                }
            },
            RunState::Validating => {
                self.validator.validate(url).await?;
                Ok(RunState::Shortening)
            }
            RunState::Shortening => {
                let prefix = self.normalizer.normalize(url);
                debug!(url = %url, prefix = %prefix, "normalized");

                let variants = expand_tags(&prefix);
                let links = self.gateway.shorten_all(&variants).await?;
                Ok(RunState::Cached(links))
            }
            RunState::Cached(links) => {
                let record = CacheRecord::new(url.clone(), links);
                let stored = self.cache.store(record).await.map_err(|e| {
                    warn!(url = %url, error = %e, "cache write failed");
                    PipelineError::from(e)
                })?;
                Ok(RunState::Served(stored))
            }
            RunState::Served(record) => Ok(RunState::Served(record)),
        }
    }
}

#[async_trait]
impl<C, S, P> Bitlinks for BitlinksService<C, S, P>
where
    C: LinkCache,
    S: Shortener,
    P: Probe,
{
    async fn bitlinks(&self, url: &str) -> Result<CacheRecord> {
        // Input that cannot be a cache key is refused before touching the cache.
        check_input(url).inspect_err(|e| debug!(error = %e, "input refused"))?;

        let url = OriginalUrl::new(url);
        let mut state = RunState::CacheCheck;
        loop {
            trace!(url = %url, state = ?state, "pipeline step");
            state = match self.step(&url, state).await {
                Ok(RunState::Served(record)) => {
                    info!(url = %url, "bitlinks served");
                    return Ok(record);
                }
                Ok(next) => next,
                Err(e) => {
                    warn!(url = %url, error = %e, code = e.code(), "bitlinks rejected");
                    return Err(e);
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{OriginPolicy, ProbeError};
    use bitlinks_core::cache::Result as CacheResult;
    use bitlinks_core::shortener::Result as ShortenResult;
    use bitlinks_core::{CacheError, MarkerMatching, ShortenerError, TaggedUrl};
    use bitlinks_storage::InMemoryLinkStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every long URL it is asked to shorten.
    #[derive(Default)]
    struct RecordingShortener {
        seen: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingShortener {
        fn failing_on(source: &'static str) -> Self {
            Self {
                fail_on: Some(source),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Shortener for RecordingShortener {
        async fn shorten(&self, long_url: &TaggedUrl) -> ShortenResult<ShortLink> {
            let count = {
                let mut seen = self.seen.lock().unwrap();
                seen.push(long_url.as_str().to_string());
                seen.len()
            };
            if let Some(source) = self.fail_on {
                if long_url.as_str().contains(&format!("utm_source={source}&")) {
                    return Err(ShortenerError::Transport("connection reset".into()));
                }
            }
            Ok(ShortLink::new(format!("http://bit.ly/{count}")))
        }
    }

    #[derive(Default)]
    struct StubProbe {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Probe for StubProbe {
        async fn probe(&self, _url: &OriginalUrl) -> std::result::Result<(), ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ProbeError::Transport("dns error".into()))
            } else {
                Ok(())
            }
        }
    }

    struct BrokenCache;

    #[async_trait]
    impl LinkCache for BrokenCache {
        async fn lookup(&self, _url: &OriginalUrl) -> CacheResult<Option<CacheRecord>> {
            Err(CacheError::Unavailable("permission denied".into()))
        }

        async fn store(&self, _record: CacheRecord) -> CacheResult<CacheRecord> {
            Err(CacheError::Unavailable("permission denied".into()))
        }
    }

    type TestService<C> = BitlinksService<C, Arc<RecordingShortener>, Arc<StubProbe>>;

    struct Harness<C> {
        service: TestService<C>,
        shortener: Arc<RecordingShortener>,
        probe: Arc<StubProbe>,
    }

    fn harness_with<C: LinkCache>(
        cache: C,
        policy: OriginPolicy,
        shortener: RecordingShortener,
        probe: StubProbe,
    ) -> Harness<C> {
        let shortener = Arc::new(shortener);
        let probe = Arc::new(probe);
        let service = BitlinksService::new(
            cache,
            Validator::new(policy, Arc::clone(&probe)),
            Normalizer::new(MarkerMatching::Substring),
            ShorteningGateway::new(Arc::clone(&shortener)),
        );
        Harness {
            service,
            shortener,
            probe,
        }
    }

    fn harness() -> Harness<InMemoryLinkStore> {
        harness_with(
            InMemoryLinkStore::new(),
            OriginPolicy::allow_all(),
            RecordingShortener::default(),
            StubProbe::default(),
        )
    }

    #[tokio::test]
    async fn tracking_parameter_is_stripped_before_tagging() {
        let h = harness();

        let record = h
            .service
            .bitlinks("https://example.com/page?from=ads")
            .await
            .unwrap();

        let mut seen = h.shortener.seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                "https://example.com/page?utm_source=instagram&utm_medium=social&utm_campaign=our-profile",
                "https://example.com/page?utm_source=telegram&utm_medium=social&utm_campaign=our-channel",
                "https://example.com/page?utm_source=vk&utm_medium=social&utm_campaign=our-public",
            ]
        );
        assert_eq!(record.original_url.as_str(), "https://example.com/page?from=ads");
    }

    #[tokio::test]
    async fn existing_query_gets_ampersand() {
        let h = harness();

        h.service
            .bitlinks("https://example.com/page?id=5")
            .await
            .unwrap();

        let seen = h.shortener.seen.lock().unwrap();
        assert!(seen.iter().all(|u| u.starts_with("https://example.com/page?id=5&utm_source=")));
    }

    #[tokio::test]
    async fn second_run_is_served_from_cache() {
        let h = harness();

        let first = h.service.bitlinks("https://example.com/page").await.unwrap();
        let second = h.service.bitlinks("https://example.com/page").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.shortener.calls(), 3);
        assert_eq!(h.probe.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_hit_skips_validation() {
        let h = harness_with(
            InMemoryLinkStore::new(),
            OriginPolicy::new(["https://allowed.example/"]),
            RecordingShortener::default(),
            StubProbe::default(),
        );
        let cached = CacheRecord::new(
            OriginalUrl::new("https://legacy.example/a"),
            PerChannel::from_fn(|channel| ShortLink::new(format!("http://bit.ly/{channel}"))),
        );
        h.service.cache().store(cached.clone()).await.unwrap();

        let served = h.service.bitlinks("https://legacy.example/a").await.unwrap();

        assert_eq!(served, cached);
        assert_eq!(h.probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.shortener.calls(), 0);
    }

    #[tokio::test]
    async fn one_failing_channel_stores_nothing() {
        let h = harness_with(
            InMemoryLinkStore::new(),
            OriginPolicy::allow_all(),
            RecordingShortener::failing_on("vk"),
            StubProbe::default(),
        );

        let err = h
            .service
            .bitlinks("https://example.com/page")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::ShorteningServiceError(ref m) if m.contains("vk")));
        assert!(h.service.cache().is_empty());
    }

    #[tokio::test]
    async fn rejected_origin_never_reaches_shortener() {
        let h = harness_with(
            InMemoryLinkStore::new(),
            OriginPolicy::new(["https://allowed.example/"]),
            RecordingShortener::default(),
            StubProbe::default(),
        );

        let err = h
            .service
            .bitlinks("https://other.example/page")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::RejectedOrigin(_)));
        assert_eq!(h.probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.shortener.calls(), 0);
    }

    #[tokio::test]
    async fn unreachable_target_is_rejected() {
        let h = harness_with(
            InMemoryLinkStore::new(),
            OriginPolicy::allow_all(),
            RecordingShortener::default(),
            StubProbe {
                fail: true,
                ..Default::default()
            },
        );

        let err = h
            .service
            .bitlinks("https://down.example/")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::UnreachableTarget(_)));
        assert_eq!(h.shortener.calls(), 0);
        assert!(h.service.cache().is_empty());
    }

    #[tokio::test]
    async fn cache_failure_is_cache_unavailable() {
        let h = harness_with(
            BrokenCache,
            OriginPolicy::allow_all(),
            RecordingShortener::default(),
            StubProbe::default(),
        );

        let err = h
            .service
            .bitlinks("https://example.com/")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::CacheUnavailable(_)));
        assert_eq!(h.shortener.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_input_is_refused_up_front() {
        let h = harness();

        let err = h.service.bitlinks("").await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidUrl(_)));

        let err = h
            .service
            .bitlinks("https://example.com/\tpage")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidUrl(_)));
        assert_eq!(h.probe.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_misses_converge_on_one_record() {
        let h = harness();
        let service = Arc::new(h.service);

        let mut handles = vec![];
        for _ in 0..4 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.bitlinks("https://example.com/hot").await.unwrap()
            }));
        }

        let mut records = vec![];
        for handle in handles {
            records.push(handle.await.unwrap());
        }

        assert!(records.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(service.cache().len(), 1);
    }
}
