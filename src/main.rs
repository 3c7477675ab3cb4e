//! LearnHub counter worker.
//!
//! Wires the Redis counter cache and dirty set to the PostgreSQL store and
//! runs the flush loop until Ctrl-C. Like events are applied by the services
//! that publish them, through their own `CounterListener` sharing the same
//! Redis cache and dirty set.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use learnhub::adapters::{PostgresCounterStore, RedisCounterCache, RedisDirtySet};
use learnhub::application::{CounterSyncer, MaxIdCache};
use learnhub::config::{AppConfig, ServerConfig};
use learnhub::domain::counter::EntityKind;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server)?;
    tracing::info!(environment = ?config.server.environment, "Starting LearnHub counter worker");

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let client = redis::Client::open(config.redis.url.as_str())?;
    let conn = tokio::time::timeout(
        config.redis.timeout(),
        client.get_multiplexed_tokio_connection(),
    )
    .await??;

    let cache = Arc::new(RedisCounterCache::new(conn.clone(), config.sync.clamp));
    let dirty = Arc::new(RedisDirtySet::with_key(conn, config.redis.dirty_set_key.clone()));
    let store = Arc::new(PostgresCounterStore::new(pool));

    let max_ids = MaxIdCache::new(cache.clone(), store.clone());
    for kind in EntityKind::ALL {
        let max = max_ids.rebuild(kind).await?;
        tracing::debug!(kind = %kind, max, "Max id scalar primed");
    }

    let syncer = Arc::new(CounterSyncer::with_config(
        cache,
        dirty,
        store,
        config.sync.syncer_config(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = {
        let syncer = syncer.clone();
        tokio::spawn(async move { syncer.run(shutdown_rx).await })
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");

    // the run loop flushes once more before it returns
    shutdown_tx.send(true)?;
    worker.await?;

    tracing::info!(
        synced = syncer.synced_count(),
        failed = syncer.failure_count(),
        "Counter worker stopped"
    );
    Ok(())
}

fn init_tracing(server: &ServerConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))?;

    let fmt_layer = if server.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().compact().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}
