use bitlinks_core::CacheError;
use bitlinks_shortener::GatewayError;
use thiserror::Error;

use crate::validator::ProbeError;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Why one pipeline run ended without links.
///
/// Every variant is request-scoped; none of them is retried.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("origin not allowed: {0}")]
    RejectedOrigin(String),
    #[error("target unreachable or not 200: {0}")]
    UnreachableTarget(String),
    #[error("shortening service error: {0}")]
    ShorteningServiceError(String),
    #[error("link cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl PipelineError {
    /// Stable machine-readable name of the variant.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::InvalidUrl(_) => "invalid_url",
            PipelineError::RejectedOrigin(_) => "rejected_origin",
            PipelineError::UnreachableTarget(_) => "unreachable_target",
            PipelineError::ShorteningServiceError(_) => "shortening_service_error",
            PipelineError::CacheUnavailable(_) => "cache_unavailable",
        }
    }
}

impl From<CacheError> for PipelineError {
    fn from(value: CacheError) -> Self {
        Self::CacheUnavailable(value.to_string())
    }
}

impl From<GatewayError> for PipelineError {
    fn from(value: GatewayError) -> Self {
        Self::ShorteningServiceError(value.to_string())
    }
}

impl From<ProbeError> for PipelineError {
    fn from(value: ProbeError) -> Self {
        Self::UnreachableTarget(value.to_string())
    }
}
