//! PostgreSQL persistence for Roster.
//!
//! Repositories for users, groups, and the validation rule catalog, plus the
//! [`PgRuleCatalog`] and [`PgRecordStore`] implementations of the validation
//! engine's collaborator traits.

use sqlx::postgres::PgPoolOptions;

pub mod catalog;
pub mod models;
pub mod record_store;
pub mod repositories;

pub use catalog::PgRuleCatalog;
pub use record_store::PgRecordStore;

pub type DbPool = sqlx::PgPool;

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

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
