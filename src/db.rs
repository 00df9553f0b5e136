//! Database connection pool and migration management.
//!
//! Both the location data path and the API key store share one PostgreSQL pool.

use sqlx::{Pool, Postgres};

/// Type alias for the PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// # Configuration
///
/// - Maximum connections: 10. Every authenticated request costs one prefix
///   lookup plus a background `last_used_at` update, so the pool is sized above
///   the number of request workers
/// - Connections are created lazily as needed
///
/// # Errors
///
/// Returns an error if the URL is invalid or the server cannot be reached.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Creates the `locations` and `api_keys` tables and their indexes. Applied
/// migrations are tracked in `_sqlx_migrations`, so each runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
