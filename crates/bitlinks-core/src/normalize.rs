//! Query-string normalization.
//!
//! Tracking parameters are stripped by an ordered, first-match-wins rule set:
//!
//! 1. a `from=` marker: truncate right before it;
//! 2. no query string at all: append `?`;
//! 3. a `utm_` marker: truncate right before it;
//! 4. an `_openstat=` marker: truncate right before it;
//! 5. otherwise append `&` to the existing query.
//!
//! The result always allows a UTM suffix to be concatenated directly.

use crate::url::{CanonicalPrefix, OriginalUrl};

const FROM_MARKER: &str = "from=";
const UTM_MARKER: &str = "utm_";
const OPENSTAT_MARKER: &str = "_openstat=";

/// How tracking markers are recognized inside a URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkerMatching {
    /// Raw substring search over the whole URL.
    ///
    /// A marker counts when it directly follows `?` or `&`, and the URL is cut
    /// at the *first* occurrence of the marker text anywhere in the string.
    /// Values such as `?ref=datefrom=1&from=x` are therefore cut inside the
    /// unrelated parameter. Existing cached links were produced this way.
    #[default]
    Substring,
    /// Markers are matched against query parameter keys only.
    QueryKey,
}

/// Turns an [`OriginalUrl`] into a [`CanonicalPrefix`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    matching: MarkerMatching,
}

impl Normalizer {
    pub fn new(matching: MarkerMatching) -> Self {
        Self { matching }
    }

    pub fn matching(&self) -> MarkerMatching {
        self.matching
    }

    pub fn normalize(&self, url: &OriginalUrl) -> CanonicalPrefix {
        let prefix = match self.matching {
            MarkerMatching::Substring => normalize_substring(url.as_str()),
            MarkerMatching::QueryKey => normalize_query_key(url.as_str()),
        };
        CanonicalPrefix::new(prefix)
    }
}

fn has_marker(url: &str, marker: &str) -> bool {
    url.contains(&format!("?{marker}")) || url.contains(&format!("&{marker}"))
}

fn truncate_at(url: &str, marker: &str) -> String {
    match url.find(marker) {
        Some(index) => url[..index].to_owned(),
        None => url.to_owned(),
    }
}

/// Appends `&` unless the URL already ends with a separator, which keeps
/// normalization idempotent on canonical prefixes.
fn append_separator(url: &str) -> String {
    if url.ends_with('?') || url.ends_with('&') {
        url.to_owned()
    } else {
        format!("{url}&")
    }
}

fn normalize_substring(url: &str) -> String {
    if has_marker(url, FROM_MARKER) {
        truncate_at(url, FROM_MARKER)
    } else if !url.contains('?') {
        format!("{url}?")
    } else if has_marker(url, UTM_MARKER) {
        truncate_at(url, UTM_MARKER)
    } else if has_marker(url, OPENSTAT_MARKER) {
        truncate_at(url, OPENSTAT_MARKER)
    } else {
        append_separator(url)
    }
}

fn normalize_query_key(url: &str) -> String {
    let Some(question) = url.find('?') else {
        return format!("{url}?");
    };

    let mut from = None;
    let mut utm = None;
    let mut openstat = None;

    let mut offset = question + 1;
    for param in url[question + 1..].split('&') {
        let key = param.split_once('=').map_or(param, |(key, _)| key);
        if key == "from" {
            from.get_or_insert(offset);
        } else if key.starts_with(UTM_MARKER) {
            utm.get_or_insert(offset);
        } else if key == "_openstat" {
            openstat.get_or_insert(offset);
        }
        offset += param.len() + 1;
    }

    match from.or(utm).or(openstat) {
        Some(index) => url[..index].to_owned(),
        None => append_separator(url),
    }
}
