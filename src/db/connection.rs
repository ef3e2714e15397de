//! Database connection management

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::{DatabaseConfig, LedgerConfig};

/// Create a new database connection pool.
///
/// Acquiring a connection is bounded by the ledger's storage timeout so a
/// saturated pool surfaces as a timeout instead of an unbounded wait.
pub async fn create_pool(config: &DatabaseConfig, ledger: &LedgerConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(ledger.storage_timeout().max(Duration::from_secs(1)))
        .connect(&config.url)
        .await
}

/// Test database connection
pub async fn test_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
