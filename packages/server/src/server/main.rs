// Main entry point for the content generation API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::server::{build_app, build_provider_registry};
use server_core::store::{ContentStore, PostgresContentStore};
use server_core::tasks::TaskWorkerConfig;
use server_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Content Generator API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Wire dependencies: store and providers are constructed once here
    // and injected; no global singletons.
    let store: Arc<dyn ContentStore> = Arc::new(PostgresContentStore::new(pool));
    let providers = Arc::new(build_provider_registry(&config));
    tracing::info!(providers = ?providers.names(), "provider registry built");

    let worker_config = TaskWorkerConfig {
        max_concurrency: config.worker_concurrency,
        ..Default::default()
    };
    let (app, worker_shutdown) = build_app(store, providers, worker_config);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    // Stop the background worker once the server loop exits.
    worker_shutdown.cancel();
    Ok(())
}
