mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bitlinks_cache::{LayeredCache, MokaLinkCache, RedisLinkCache};
use bitlinks_core::{LinkCache, MarkerMatching, Normalizer, Shortener};
use bitlinks_gateway::{App, AppState};
use bitlinks_pipeline::{BitlinksService, HttpProbe, OriginPolicy, Validator};
use bitlinks_shortener::{BitlyConfig, BitlyShortener, SeqShortener, ShorteningGateway};
use bitlinks_storage::{InMemoryLinkStore, TsvLinkStore};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{LogFormatArg, ShortenerBackendArg, StorageBackendArg, CLI, DEFAULT_SEQ_PREFIX};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        shortener = %config.shortener,
        storage = %config.storage,
        l1_capacity = config.l1_capacity,
        allowed_origins = config.allowed_origins.len(),
        "starting bitlinks gateway"
    );

    let cache = build_cache(&config).await?;
    let shortener = build_shortener(&config)?;

    let probe = HttpProbe::new(Duration::from_secs(config.probe_timeout_secs))?;
    let validator = Validator::new(OriginPolicy::new(config.allowed_origins.clone()), probe);
    let normalizer = Normalizer::new(if config.query_key_markers {
        MarkerMatching::QueryKey
    } else {
        MarkerMatching::Substring
    });
    let gateway = ShorteningGateway::with_timeout(
        shortener,
        Duration::from_secs(config.shorten_timeout_secs),
    );

    let service = BitlinksService::new(cache, validator, normalizer, gateway);
    run_server(config.listen_addr, AppState::new(Arc::new(service))).await
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn build_cache(config: &CLI) -> anyhow::Result<Arc<dyn LinkCache>> {
    let store: Arc<dyn LinkCache> = match config.storage {
        StorageBackendArg::File => {
            info!(path = %config.cache_file.display(), "using cache file");
            Arc::new(TsvLinkStore::new(&config.cache_file))
        }
        StorageBackendArg::InMemory => Arc::new(InMemoryLinkStore::new()),
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when storage backend is redis")?;
            Arc::new(RedisLinkCache::connect(redis_url).await?)
        }
    };

    if config.l1_capacity == 0 {
        return Ok(store);
    }
    Ok(Arc::new(LayeredCache::new(
        MokaLinkCache::with_capacity(config.l1_capacity),
        store,
    )))
}

fn build_shortener(config: &CLI) -> anyhow::Result<Arc<dyn Shortener>> {
    match config.shortener {
        ShortenerBackendArg::Bitly => {
            let token = config
                .bitly_token
                .clone()
                .context("bitly token is required when shortener is bitly")?;
            let bitly = match &config.bitly_domain {
                Some(domain) => BitlyConfig::builder()
                    .token(token)
                    .api_base(config.bitly_api_base.clone())
                    .domain(domain.clone())
                    .build(),
                None => BitlyConfig::builder()
                    .token(token)
                    .api_base(config.bitly_api_base.clone())
                    .build(),
            };
            Ok(Arc::new(BitlyShortener::new(bitly)?))
        }
        ShortenerBackendArg::Seq => Ok(Arc::new(SeqShortener::new(
            config.seq_base_url.clone(),
            DEFAULT_SEQ_PREFIX,
        ))),
    }
}

async fn run_server(listen_addr: std::net::SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("bitlinks gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
