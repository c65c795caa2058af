//! PostgreSQL-backed duplicate lookups for uniqueness rules.
//!
//! Table and column names arrive from rule definitions, so they are checked
//! against a plain identifier grammar and double-quoted before being spliced
//! into SQL. Values are always bound.

use roster_core::types::DbId;
use roster_core::validation::{RecordStore, StoreError};
use sqlx::PgPool;

/// A table or column name that cannot be used in a query.
#[derive(Debug, thiserror::Error)]
#[error("Invalid SQL identifier: '{0}'")]
pub struct InvalidIdentifier(pub String);

/// Counts matching rows in arbitrary application tables.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Quote `ident` after checking it matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn quote_identifier(ident: &str) -> Result<String, InvalidIdentifier> {
    let mut chars = ident.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(format!("\"{ident}\""))
    } else {
        Err(InvalidIdentifier(ident.to_string()))
    }
}

fn store_error(table: &str, column: &str, e: sqlx::Error) -> StoreError {
    tracing::error!(table, column, error = %e, "Duplicate lookup failed");
    Box::new(e)
}

impl RecordStore for PgRecordStore {
    async fn count_matching(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<i64, StoreError> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE {}::text = $1",
            quote_identifier(table)?,
            quote_identifier(column)?
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error(table, column, e))
    }

    async fn count_matching_excluding(
        &self,
        table: &str,
        exclude_id: DbId,
        column: &str,
        value: &str,
    ) -> Result<i64, StoreError> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE {}::text = $1 AND id <> $2",
            quote_identifier(table)?,
            quote_identifier(column)?
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(value)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error(table, column, e))
    }
}
