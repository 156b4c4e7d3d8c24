use crate::channel::PerChannel;
use crate::url::{CanonicalPrefix, TaggedUrl};

/// Builds one campaign-tagged URL per channel from a canonical prefix.
pub fn expand_tags(prefix: &CanonicalPrefix) -> PerChannel<TaggedUrl> {
    PerChannel::from_fn(|channel| {
        TaggedUrl::new(format!("{}{}", prefix.as_str(), channel.utm_suffix()))
    })
}
