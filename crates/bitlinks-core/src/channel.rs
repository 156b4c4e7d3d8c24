use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A distribution channel that gets its own campaign-tagged link.
///
/// The set is closed: every request produces exactly one link per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Telegram,
    Vk,
    Instagram,
}

const UTM_MEDIUM: &str = "social";

impl Channel {
    /// All channels in their canonical order.
    pub const ALL: [Channel; 3] = [Channel::Telegram, Channel::Vk, Channel::Instagram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Telegram => "telegram",
            Channel::Vk => "vk",
            Channel::Instagram => "instagram",
        }
    }

    pub fn utm_source(&self) -> &'static str {
        self.as_str()
    }

    pub fn utm_medium(&self) -> &'static str {
        UTM_MEDIUM
    }

    pub fn utm_campaign(&self) -> &'static str {
        match self {
            Channel::Telegram => "our-channel",
            Channel::Vk => "our-public",
            Channel::Instagram => "our-profile",
        }
    }

    /// The query suffix appended to a canonical prefix for this channel.
    pub fn utm_suffix(&self) -> String {
        format!(
            "utm_source={}&utm_medium={}&utm_campaign={}",
            self.utm_source(),
            self.utm_medium(),
            self.utm_campaign()
        )
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per [`Channel`].
///
/// Iteration always follows [`Channel::ALL`]: telegram, vk, instagram.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerChannel<T> {
    pub telegram: T,
    pub vk: T,
    pub instagram: T,
}

impl<T> PerChannel<T> {
    /// Builds the triple by calling `f` once per channel, in canonical order.
    pub fn from_fn(mut f: impl FnMut(Channel) -> T) -> Self {
        Self {
            telegram: f(Channel::Telegram),
            vk: f(Channel::Vk),
            instagram: f(Channel::Instagram),
        }
    }

    pub fn get(&self, channel: Channel) -> &T {
        match channel {
            Channel::Telegram => &self.telegram,
            Channel::Vk => &self.vk,
            Channel::Instagram => &self.instagram,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Channel, T) -> U) -> PerChannel<U> {
        PerChannel {
            telegram: f(Channel::Telegram, self.telegram),
            vk: f(Channel::Vk, self.vk),
            instagram: f(Channel::Instagram, self.instagram),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().map(move |channel| (channel, self.get(channel)))
    }

    pub fn into_array(self) -> [T; 3] {
        [self.telegram, self.vk, self.instagram]
    }
}
