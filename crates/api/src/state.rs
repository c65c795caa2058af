use std::sync::Arc;

use roster_core::validation::{CachedCatalog, CatalogEntry, RuleCatalog, StoreError};
use roster_db::{DbPool, PgRecordStore, PgRuleCatalog};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Rule catalog used to resolve form rules.
    pub catalog: Arc<AppCatalog>,
    /// Record store used for uniqueness checks.
    pub records: PgRecordStore,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        let catalog = AppCatalog::new(pool.clone(), config.catalog_cache);
        Self {
            records: PgRecordStore::new(pool.clone()),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            pool,
        }
    }
}

/// The rule catalog, optionally memoised.
#[derive(Debug)]
pub enum AppCatalog {
    Cached(CachedCatalog<PgRuleCatalog>),
    Direct(PgRuleCatalog),
}

impl AppCatalog {
    pub fn new(pool: DbPool, cache: bool) -> Self {
        let catalog = PgRuleCatalog::new(pool);
        if cache {
            Self::Cached(CachedCatalog::new(catalog))
        } else {
            Self::Direct(catalog)
        }
    }

    /// Forget any cached entry for `name`. Called after every catalog write.
    pub fn invalidate(&self, name: &str) {
        if let Self::Cached(cached) = self {
            cached.invalidate(name);
            tracing::debug!(rule = name, "Invalidated cached catalog entry");
        }
    }
}

impl RuleCatalog for AppCatalog {
    async fn lookup(&self, name: &str) -> Result<Option<CatalogEntry>, StoreError> {
        match self {
            Self::Cached(catalog) => catalog.lookup(name).await,
            Self::Direct(catalog) => catalog.lookup(name).await,
        }
    }
}
