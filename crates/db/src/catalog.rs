//! PostgreSQL-backed rule catalog.

use roster_core::validation::{CatalogEntry, RuleCatalog, StoreError};
use sqlx::PgPool;

use crate::repositories::ValidateRuleRepo;

/// Reads rule templates from the `validate_rules` table.
#[derive(Debug, Clone)]
pub struct PgRuleCatalog {
    pool: PgPool,
}

impl PgRuleCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RuleCatalog for PgRuleCatalog {
    async fn lookup(&self, name: &str) -> Result<Option<CatalogEntry>, StoreError> {
        let row = ValidateRuleRepo::find_by_name(&self.pool, name)
            .await
            .map_err(|e| {
                tracing::error!(rule = name, error = %e, "Rule catalog lookup failed");
                Box::new(e) as StoreError
            })?;
        Ok(row.map(CatalogEntry::from))
    }
}
