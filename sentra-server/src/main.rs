use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sentra_core::{
    NucleiAdapter, PostgresScanStore, ScanDispatcher, ScanLifecycle, ScannerAdapter,
    SystemClock,
};
use sentra_server::{handlers, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sentra_core=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;
    let store = PostgresScanStore::new(pool).await?;
    store.init_schema().await?;

    let adapter = Arc::new(NucleiAdapter::new(&config.scanner));
    if !adapter.check_available().await {
        warn!(
            tool = %config.scanner.tool_path,
            "scanner tool not found; scans will fail until it is installed"
        );
    }

    let lifecycle = Arc::new(ScanLifecycle::new(
        Arc::new(store),
        adapter,
        Arc::new(SystemClock),
        config.scanner.clone(),
    ));
    let dispatcher = ScanDispatcher::start(
        Arc::clone(&lifecycle),
        config.scanner.max_concurrent_scans,
    );

    let state = AppState {
        lifecycle,
        queue: dispatcher.clone(),
    };
    let app = handlers::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!(address = %config.bind_address(), "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutting down; waiting for in-flight scans");
    dispatcher.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install shutdown signal handler");
    }
}
