use anyhow::Result;
use axum::{routing::get, serve, Router};
use chainpulse_core::{
    broadcast::{BroadcastHub, TpsPublisher},
    cache::{MemoryKv, MetricsCache},
    config::AppConfig,
    metrics::MetricsCollector,
    refresh::{run_refresh_loop, Refresher},
    store::{BlockSource, PgBlockSource, Store},
};
use server::{router, state::AppState, ws};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{signal, sync::broadcast};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Per-subscriber frame backlog before lagging sessions start dropping.
const BROADCAST_CAPACITY: usize = 64;

/// Initializes the logging system based on the configuration.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,chainpulse_core={level},server={level}",
            level = config.logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format.as_str() == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        // "pretty" and any other format default to pretty logging
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config =
        AppConfig::load().map_err(|e| anyhow::anyhow!("configuration load failed: {e}"))?;

    init_logging(&config);
    info!(environment = %config.environment, "starting chainpulse");

    if config.metrics.enabled {
        MetricsCollector::install()
            .map_err(|e| anyhow::anyhow!("metrics recorder init failed: {e}"))?;
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let store = Store::connect(&config.database.url, config.database.max_connections)?;
    if config.database.reset_on_start {
        reset_store(&store).await?;
    }

    let source: Arc<dyn BlockSource> = Arc::new(PgBlockSource::new(store.pool().clone()));
    let cache = MetricsCache::new(Arc::new(MemoryKv::new()));
    let hub = BroadcastHub::new(BROADCAST_CAPACITY);
    let publisher = TpsPublisher::new(hub.clone());

    let refresher = Arc::new(Refresher::new(source.clone(), cache.clone(), publisher));
    let refresh_handle = tokio::spawn(run_refresh_loop(
        refresher,
        Duration::from_secs(config.refresh.interval_seconds),
        config.refresh.limit,
        shutdown_tx.subscribe(),
    ));

    let state = AppState { cache, hub, source };
    let app = create_app(state, &config);

    let addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.bind_port)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address: {e}"))?;
    info!(address = %addr, "dashboard server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        error!(error = %e, "server error occurred");
    }

    let _ = shutdown_tx.send(());
    refresh_handle.abort();
    info!("server shutdown complete");

    Ok(())
}

/// Drops every table in the store schema so the indexer can rebuild from
/// scratch. Only reachable when `database.reset_on_start` is explicitly
/// enabled.
async fn reset_store(store: &Store) -> Result<()> {
    warn!("database.reset_on_start enabled; dropping all tables");

    let mut tx = store.begin().await?;
    if let Err(error) = tx.drop_all_tables().await {
        tx.rollback().await;
        return Err(error.into());
    }
    tx.commit().await?;
    Ok(())
}

fn create_app(state: AppState, config: &AppConfig) -> Router {
    let api = Router::new()
        .route("/api/throughput", get(router::handle_throughput))
        .route("/api/throughput/window", get(router::handle_throughput_window))
        .layer(ConcurrencyLimitLayer::new(config.server.max_concurrent_requests))
        .layer(CompressionLayer::new());

    Router::new()
        .route("/health", get(router::handle_health))
        .route("/metrics", get(router::handle_metrics))
        .route("/ws", get(ws::handle_ws))
        .merge(api)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install signal handler");
                () = std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, starting graceful shutdown");
}
