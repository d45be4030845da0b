//! Account Transfer Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Wire repository, number generator and service
//! 5. Start server on configured port

use std::sync::Arc;

use account_transfer_server::{
    config, db,
    repository::PgAccountRepository,
    router,
    services::{AccountService, number_generator::RandomAccountNumbers},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config).await?;
    tracing::info!(
        max_connections = config.database_max_connections,
        statement_timeout_ms = config.statement_timeout_ms,
        "Database pool created"
    );

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let service = AccountService::new(
        Arc::new(PgAccountRepository::new(pool)),
        Arc::new(RandomAccountNumbers::new(config.account_number_range)),
    )
    .with_retry_backoff(config.transfer_retry_backoff());

    let app = router(service);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
