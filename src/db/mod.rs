//! Database access: pool setup, schema migrations and repositories

pub mod connection;
pub mod repositories;

use sqlx::{migrate::Migrator, PgPool};
use tracing::info;

pub use connection::*;

/// Users and timesheet schema, embedded at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Bring the schema up to date
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    info!(migrations = MIGRATOR.iter().count(), "Database schema up to date");
    Ok(())
}
