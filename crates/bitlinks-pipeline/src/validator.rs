use async_trait::async_trait;
use bitlinks_core::OriginalUrl;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::error::{PipelineError, Result};

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a live probe did not confirm the target.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("probe timed out: {0}")]
    Timeout(String),
    #[error("probe failed: {0}")]
    Transport(String),
    #[error("target answered with status {0}")]
    Status(u16),
}

/// Confirms that a URL is reachable right now.
#[async_trait]
pub trait Probe: Send + Sync + 'static {
    async fn probe(&self, url: &OriginalUrl) -> std::result::Result<(), ProbeError>;
}

#[async_trait]
impl<T: Probe + ?Sized> Probe for Arc<T> {
    async fn probe(&self, url: &OriginalUrl) -> std::result::Result<(), ProbeError> {
        (**self).probe(url).await
    }
}

/// Probes with an HTTP GET, following redirects. Only `200 OK` passes.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> std::result::Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self { client })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout(err.to_string())
    } else {
        ProbeError::Transport(err.to_string())
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, url: &OriginalUrl) -> std::result::Result<(), ProbeError> {
        trace!(url = %url, "probing target");
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match response.status() {
            StatusCode::OK => Ok(()),
            other => Err(ProbeError::Status(other.as_u16())),
        }
    }
}

/// Static allow-list of URL prefixes.
///
/// Matching is a plain string-prefix comparison, so `https://example.com`
/// also admits `https://example.com.evil.org`; configure origins with a
/// trailing `/` to avoid that. An empty list admits every URL.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = origins
            .into_iter()
            .map(Into::into)
            .filter(|origin: &String| !origin.is_empty())
            .collect();
        Self { allowed }
    }

    pub fn origins(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_allowed(&self, url: &str) -> bool {
        self.allowed.is_empty() || self.allowed.iter().any(|origin| url.starts_with(origin))
    }
}

/// Rejects input that can never become a cache key.
///
/// Tabs and line breaks would corrupt the tab-separated store.
pub fn check_input(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(PipelineError::InvalidUrl("url cannot be empty".to_string()));
    }
    if url.contains(['\t', '\r', '\n']) {
        return Err(PipelineError::InvalidUrl(
            "url must not contain tabs or line breaks".to_string(),
        ));
    }
    Ok(())
}

/// Origin check followed by a live probe.
#[derive(Debug, Clone)]
pub struct Validator<P> {
    policy: OriginPolicy,
    probe: P,
}

impl<P: Probe> Validator<P> {
    pub fn new(policy: OriginPolicy, probe: P) -> Self {
        Self { policy, probe }
    }

    pub fn policy(&self) -> &OriginPolicy {
        &self.policy
    }

    /// Disallowed origins are rejected without any network traffic.
    pub async fn validate(&self, url: &OriginalUrl) -> Result<()> {
        check_input(url.as_str())?;

        if !self.policy.is_allowed(url.as_str()) {
            debug!(url = %url, "origin not in allow-list");
            return Err(PipelineError::RejectedOrigin(url.to_string()));
        }

        self.probe.probe(url).await.map_err(|e| {
            warn!(url = %url, error = %e, "target probe failed");
            PipelineError::from(e)
        })?;

        debug!(url = %url, "url validated");
        Ok(())
    }
}
