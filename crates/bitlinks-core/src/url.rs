use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The untrusted URL string exactly as submitted by a caller.
///
/// It is only ever pattern-matched and used as the cache key; it is never
/// parsed into a structured URL, so two spellings of the same resource are
/// two distinct keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OriginalUrl(String);

impl OriginalUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for OriginalUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OriginalUrl {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The original URL with tracking parameters stripped, ready for a UTM
/// suffix to be appended verbatim.
///
/// Only [`Normalizer`](crate::Normalizer) produces values of this type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CanonicalPrefix(String);

impl CanonicalPrefix {
    pub(crate) fn new(prefix: String) -> Self {
        Self(prefix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CanonicalPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A canonical prefix followed by one channel's UTM query suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaggedUrl(String);

impl TaggedUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaggedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A short URL handed back by the shortening service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortLink(String);

impl ShortLink {
    pub fn new(link: impl Into<String>) -> Self {
        Self(link.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ShortLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
