//! PostgreSQL access for submissions and waitlist entries.
//!
//! - [`models`]: row structs and request DTOs.
//! - [`repositories`]: stateless query helpers, one per table.
//! - [`QueryError`]: structured `{ code, message }` failures for read paths.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;

pub use error::{QueryError, SCHEMA_MISSING};

pub type DbPool = sqlx::PgPool;

/// Name of the `LISTEN`/`NOTIFY` channel the record-table triggers publish on.
pub const CHANGE_CHANNEL: &str = "table_changes";

/// SQL that creates every table, index and trigger the service needs.
///
/// Shown to operators when the schema is missing and migrations are not
/// run by the service itself.
pub const SETUP_SCRIPT: &str = concat!(
    include_str!("../../../db/migrations/20260101000001_create_submissions.sql"),
    "\n",
    include_str!("../../../db/migrations/20260101000002_create_waitlist.sql"),
    "\n",
    include_str!("../../../db/migrations/20260101000003_table_change_notifications.sql"),
);

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the bundled migrations in `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
