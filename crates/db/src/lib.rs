//! PostgreSQL persistence for the publishing pipeline.
//!
//! - [`models`] — `FromRow` entity structs and request DTOs.
//! - [`repositories`] — zero-sized repository structs with async CRUD
//!   methods taking `&PgPool`.
//!
//! Pool construction, health checking, and migrations live here so the API
//! server and the scheduler binary share one bootstrap path.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod models;
pub mod repositories;

/// Shared connection pool type used across the workspace.
pub type DbPool = PgPool;

/// Maximum connections per process. Two processes (API + scheduler) stay
/// comfortably under the default PostgreSQL limit of 100.
const MAX_CONNECTIONS: u32 = 20;

/// Create a connection pool for the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial round-trip.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Apply all pending migrations from this crate's `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
