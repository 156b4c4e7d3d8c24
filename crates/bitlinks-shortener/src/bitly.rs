use async_trait::async_trait;
use bitlinks_core::shortener::Result;
use bitlinks_core::{ShortLink, Shortener, ShortenerError, TaggedUrl};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_API_BASE: &str = "https://api-ssl.bitly.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`BitlyShortener`].
#[derive(Clone, TypedBuilder)]
pub struct BitlyConfig {
    /// Generic access token, sent as a bearer token.
    #[builder(setter(into))]
    token: String,
    #[builder(default = DEFAULT_API_BASE.to_string(), setter(into))]
    api_base: String,
    /// Branded short domain, e.g. `bit.ly`.
    #[builder(default, setter(strip_option, into))]
    domain: Option<String>,
    #[builder(default, setter(strip_option, into))]
    group_guid: Option<String>,
    /// Upper bound for one HTTP exchange.
    #[builder(default = DEFAULT_TIMEOUT)]
    timeout: Duration,
}

impl std::fmt::Debug for BitlyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitlyConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("domain", &self.domain)
            .field("group_guid", &self.group_guid)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ShortenRequest<'a> {
    long_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_guid: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ShortenResponse {
    link: String,
}

/// A [`Shortener`] backed by the Bitly v4 `shorten` endpoint.
#[derive(Clone)]
pub struct BitlyShortener {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    domain: Option<String>,
    group_guid: Option<String>,
}

impl std::fmt::Debug for BitlyShortener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitlyShortener")
            .field("endpoint", &self.endpoint)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

impl BitlyShortener {
    pub fn new(config: BitlyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShortenerError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v4/shorten", config.api_base.trim_end_matches('/')),
            token: config.token,
            domain: config.domain,
            group_guid: config.group_guid,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn map_reqwest_error(operation: &str, err: reqwest::Error) -> ShortenerError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        ShortenerError::Timeout(message)
    } else if err.is_decode() {
        ShortenerError::InvalidResponse(message)
    } else {
        ShortenerError::Transport(message)
    }
}

fn map_status_error(status: StatusCode, body: String) -> ShortenerError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ShortenerError::Unauthorized(body),
        StatusCode::TOO_MANY_REQUESTS => ShortenerError::RateLimited(body),
        other => ShortenerError::Rejected {
            status: other.as_u16(),
            message: body,
        },
    }
}

#[async_trait]
impl Shortener for BitlyShortener {
    async fn shorten(&self, long_url: &TaggedUrl) -> Result<ShortLink> {
        trace!(url = %long_url, "requesting bitlink");

        let request = ShortenRequest {
            long_url: long_url.as_str(),
            domain: self.domain.as_deref(),
            group_guid: self.group_guid.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_reqwest_error("bitly request failed", e))?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            let body: ShortenResponse = response
                .json()
                .await
                .map_err(|e| ShortenerError::InvalidResponse(format!("unexpected bitly body: {e}")))?;
            debug!(url = %long_url, link = %body.link, "bitlink created");
            return Ok(ShortLink::new(body.link));
        }

        let body = response.text().await.unwrap_or_default();
        warn!(url = %long_url, status = status.as_u16(), "bitly refused request");
        Err(map_status_error(status, body))
    }
}
