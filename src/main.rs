use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use track_lookup::cache::QueryCache;
use track_lookup::config::{Config, StoreBackend};
use track_lookup::sources::{Resolver, YouTubeApiResolver};
use track_lookup::store::{MemoryStore, RedisStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("track_lookup=debug".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("🎵 Iniciando track-lookup v{}", env!("CARGO_PKG_VERSION"));

    // Cargar configuración
    let config = Config::load()?;
    info!("{}", config.summary());

    if std::env::args().any(|arg| arg == "--health-check") {
        return health_check(&config).await;
    }

    let queries: Vec<String> = std::env::args().skip(1).collect();
    if queries.is_empty() {
        anyhow::bail!("Uso: track-lookup <query>...");
    }

    let store = build_store(&config).await;

    let resolver = YouTubeApiResolver::new(
        config.youtube_api_key.clone(),
        config.youtube_api_base.clone(),
        config.resolver_timeout,
    )?;
    info!("🔍 Resolver: {}", resolver.name());

    let cache = QueryCache::with_settings(store, Arc::new(resolver), config.cache_settings());

    let mut failures = 0;
    for query in &queries {
        match cache.lookup(query).await {
            Ok(track) => println!("{}", serde_json::to_string(&track)?),
            Err(e) => {
                error!("❌ '{}': {}", query, e);
                failures += 1;
            }
        }
    }

    println!("{}", serde_json::to_string(&cache.stats())?);

    if failures > 0 {
        anyhow::bail!("{} de {} búsquedas fallaron", failures, queries.len());
    }
    Ok(())
}

async fn build_store(config: &Config) -> Arc<dyn Store> {
    match config.store_backend {
        StoreBackend::Redis => {
            let store = Arc::new(RedisStore::connect(&config.redis_url).await);
            if store.is_connected() {
                store.spawn_health_monitor(config.store_health_interval);
            }
            store
        }
        StoreBackend::Memory => {
            let store = MemoryStore::new();
            let janitor = store.clone();
            let every = config.store_health_interval;

            // Limpieza periódica de entradas expiradas
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(every);
                loop {
                    ticker.tick().await;
                    janitor.cleanup_expired();
                }
            });

            info!("🗄️ Usando store en memoria");
            Arc::new(store)
        }
    }
}

async fn health_check(config: &Config) -> Result<()> {
    match config.store_backend {
        StoreBackend::Redis => {
            let store = RedisStore::try_connect(&config.redis_url).await?;
            store.ping().await?;
        }
        StoreBackend::Memory => {}
    }

    println!("OK");
    Ok(())
}
