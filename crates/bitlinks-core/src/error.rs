use thiserror::Error;

/// Errors raised by [`LinkCache`](crate::LinkCache) backends.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache initialization failed: {0}")]
    Initialization(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Errors raised by a single call to an external [`Shortener`](crate::Shortener).
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("shortening service rejected credentials: {0}")]
    Unauthorized(String),
    #[error("shortening service rate limit reached: {0}")]
    RateLimited(String),
    #[error("shortening service answered with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("shortening service unreachable: {0}")]
    Transport(String),
    #[error("shortening call timed out: {0}")]
    Timeout(String),
    #[error("shortening service response is invalid: {0}")]
    InvalidResponse(String),
}
