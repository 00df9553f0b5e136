//! Location Logger - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load and validate configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the key manager (Argon2 hasher + PostgreSQL key store)
//! 5. Build HTTP router and start serving

use std::sync::Arc;

use location_logger::{
    config::Config,
    db,
    keys::{KeyHasher, KeyManager, PgKeyStore},
    routes,
    state::AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        database = %config.redacted_database_url(),
        api_key_expiration_days = config.api_key_expiration_days,
        "Configuration loaded"
    );

    let pool = db::create_pool(config.database_url()).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let hasher = KeyHasher::new(config.key_hash_memory_kib, config.key_hash_iterations)?;
    let keys = KeyManager::new(
        Arc::new(PgKeyStore::new(pool.clone())),
        hasher,
        config.api_key_expiration_days,
    );

    let app = routes::app(AppState::new(pool, keys, &config.admin_token));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
