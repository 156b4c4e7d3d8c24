use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "BITLINKS_LISTEN_ADDR";
pub const ALLOWED_ORIGINS_ENV: &str = "BITLINKS_ALLOWED_ORIGINS";
pub const PROBE_TIMEOUT_SECS_ENV: &str = "BITLINKS_PROBE_TIMEOUT_SECS";
pub const QUERY_KEY_MARKERS_ENV: &str = "BITLINKS_QUERY_KEY_MARKERS";
pub const SHORTENER_BACKEND_ENV: &str = "BITLINKS_SHORTENER";
pub const BITLY_TOKEN_ENV: &str = "BITLINKS_BITLY_TOKEN";
pub const BITLY_API_BASE_ENV: &str = "BITLINKS_BITLY_API_BASE";
pub const BITLY_DOMAIN_ENV: &str = "BITLINKS_BITLY_DOMAIN";
pub const SEQ_BASE_URL_ENV: &str = "BITLINKS_SEQ_BASE_URL";
pub const SHORTEN_TIMEOUT_SECS_ENV: &str = "BITLINKS_SHORTEN_TIMEOUT_SECS";
pub const STORAGE_BACKEND_ENV: &str = "BITLINKS_STORAGE";
pub const CACHE_FILE_ENV: &str = "BITLINKS_CACHE_FILE";
pub const REDIS_URL_ENV: &str = "BITLINKS_REDIS_URL";
pub const L1_CAPACITY_ENV: &str = "BITLINKS_L1_CAPACITY";
pub const LOG_FORMAT_ENV: &str = "BITLINKS_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BITLY_API_BASE: &str = "https://api-ssl.bitly.com";
pub const DEFAULT_SEQ_BASE_URL: &str = "http://localhost:8080/s";
pub const DEFAULT_SEQ_PREFIX: &str = "bl";
pub const DEFAULT_SHORTEN_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_FILE: &str = "bitlinks-cache.tsv";
pub const DEFAULT_L1_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShortenerBackendArg {
    #[value(name = "bitly")]
    Bitly,
    #[value(name = "seq")]
    Seq,
}

impl Display for ShortenerBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShortenerBackendArg::Bitly => write!(f, "bitly"),
            ShortenerBackendArg::Seq => write!(f, "seq"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "file")]
    File,
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::File => write!(f, "file"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "bitlinks", about = "Campaign-tagged short links for one page")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// URL prefix a submitted link must start with. Repeatable; none allows all.
    #[arg(
        long = "allowed-origin",
        env = ALLOWED_ORIGINS_ENV,
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long, env = PROBE_TIMEOUT_SECS_ENV, default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    pub probe_timeout_secs: u64,

    /// Match tracking markers against query keys instead of raw substrings.
    #[arg(long, env = QUERY_KEY_MARKERS_ENV)]
    pub query_key_markers: bool,

    #[arg(
        long,
        env = SHORTENER_BACKEND_ENV,
        value_enum,
        default_value_t = ShortenerBackendArg::Bitly
    )]
    pub shortener: ShortenerBackendArg,

    #[arg(long, env = BITLY_TOKEN_ENV, hide_env_values = true)]
    pub bitly_token: Option<String>,

    #[arg(long, env = BITLY_API_BASE_ENV, default_value = DEFAULT_BITLY_API_BASE)]
    pub bitly_api_base: String,

    #[arg(long, env = BITLY_DOMAIN_ENV)]
    pub bitly_domain: Option<String>,

    #[arg(long, env = SEQ_BASE_URL_ENV, default_value = DEFAULT_SEQ_BASE_URL)]
    pub seq_base_url: String,

    #[arg(
        long,
        env = SHORTEN_TIMEOUT_SECS_ENV,
        default_value_t = DEFAULT_SHORTEN_TIMEOUT_SECS
    )]
    pub shorten_timeout_secs: u64,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::File
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = CACHE_FILE_ENV, default_value = DEFAULT_CACHE_FILE)]
    pub cache_file: PathBuf,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    /// Entries kept in the in-process cache in front of the store; 0 disables it.
    #[arg(long, env = L1_CAPACITY_ENV, default_value_t = DEFAULT_L1_CAPACITY)]
    pub l1_capacity: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}
