use bitlinks_core::CacheRecord;
use serde::{Deserialize, Serialize};

/// A missing `url` reads as empty and is refused by the pipeline.
#[derive(Debug, Deserialize)]
pub struct BitlinksQuery {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct BitlinksForm {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct BitlinksResponse {
    pub original_url: String,
    pub telegram: String,
    pub vk: String,
    pub instagram: String,
}

impl From<CacheRecord> for BitlinksResponse {
    fn from(record: CacheRecord) -> Self {
        let [telegram, vk, instagram] = record.links.into_array();
        Self {
            original_url: record.original_url.into_inner(),
            telegram: telegram.into_inner(),
            vk: vk.into_inner(),
            instagram: instagram.into_inner(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AjaxBitlinksResponse {
    pub bitlink_telegram: String,
    pub bitlink_vk: String,
    pub bitlink_instagram: String,
}

impl AjaxBitlinksResponse {
    /// The page script prints these fields verbatim, so a refused URL is
    /// reported through them with `200 OK`.
    pub fn rejected() -> Self {
        Self {
            bitlink_telegram: "Bad URL or HTTP / Connection Error".to_string(),
            bitlink_vk: "Only existing pages (200 OK) of allowed websites are accepted."
                .to_string(),
            bitlink_instagram: ":(".to_string(),
        }
    }
}

impl From<CacheRecord> for AjaxBitlinksResponse {
    fn from(record: CacheRecord) -> Self {
        let [telegram, vk, instagram] = record.links.into_array();
        Self {
            bitlink_telegram: telegram.into_inner(),
            bitlink_vk: vk.into_inner(),
            bitlink_instagram: instagram.into_inner(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
