//! Rule catalog collaborator and rule resolution.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use super::error::StoreError;
use super::rules::{merge, CatalogEntry, RuleDecl, RuleSet};

/// Read-only source of named rule templates.
pub trait RuleCatalog: Send + Sync {
    /// Fetch the catalog entry called `name`, or `None` if there is none.
    fn lookup(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<CatalogEntry>, StoreError>> + Send;
}

/// Resolve caller declarations against `catalog`.
///
/// Each declaration is looked up by its name, merged with its overlay, and
/// stored under its alias when one is given. Declaration order is kept.
pub async fn resolve_rules<C: RuleCatalog>(
    catalog: &C,
    decls: &[RuleDecl],
) -> Result<RuleSet, StoreError> {
    let mut rules = RuleSet::new();
    for decl in decls {
        let entry = catalog.lookup(decl.lookup_key()).await?;
        let (field, spec) = merge(decl, entry.as_ref());
        rules.insert(field, spec);
    }
    tracing::debug!(
        declared = decls.len(),
        resolved = rules.len(),
        "Resolved validation rules"
    );
    Ok(rules)
}

/// In-memory catalog, mostly useful for tests and fixed rule tables.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.name.clone(), entry))
                .collect(),
        }
    }
}

impl RuleCatalog for StaticCatalog {
    async fn lookup(&self, name: &str) -> Result<Option<CatalogEntry>, StoreError> {
        Ok(self.entries.get(name).cloned())
    }
}

/// Process-wide memoisation of another catalog's lookups, misses included.
///
/// Whoever mutates the underlying catalog must call [`invalidate`] or
/// [`invalidate_all`]. A lookup that was already in flight when either is
/// called does not store its result.
///
/// [`invalidate`]: CachedCatalog::invalidate
/// [`invalidate_all`]: CachedCatalog::invalidate_all
#[derive(Debug)]
pub struct CachedCatalog<C> {
    inner: C,
    state: RwLock<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    /// Bumped by every invalidation.
    generation: u64,
    entries: HashMap<String, Option<CatalogEntry>>,
}

impl<C: RuleCatalog> CachedCatalog<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            state: RwLock::new(CacheState::default()),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drop the cached entry for `name`.
    pub fn invalidate(&self, name: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        state.entries.remove(name);
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        state.entries.clear();
    }

    /// The cached entry (if any) and the generation it was read at.
    fn cached(&self, name: &str) -> (Option<Option<CatalogEntry>>, u64) {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        (state.entries.get(name).cloned(), state.generation)
    }

    /// Store `entry` unless an invalidation happened since `generation`.
    fn remember(&self, name: &str, entry: Option<CatalogEntry>, generation: u64) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.generation == generation {
            state.entries.insert(name.to_string(), entry);
        } else {
            tracing::debug!(rule = name, "Catalog changed during lookup; not caching");
        }
    }
}

impl<C: RuleCatalog> RuleCatalog for CachedCatalog<C> {
    async fn lookup(&self, name: &str) -> Result<Option<CatalogEntry>, StoreError> {
        let (hit, generation) = self.cached(name);
        if let Some(hit) = hit {
            return Ok(hit);
        }
        let entry = self.inner.lookup(name).await?;
        self.remember(name, entry.clone(), generation);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use super::*;
    use crate::validation::rules::{RuleOverlay, UniqueAction, UniqueRule};

    fn group_catalog() -> StaticCatalog {
        StaticCatalog::new([
            CatalogEntry {
                name: "groupname".to_string(),
                display: Some("Group Name".to_string()),
                required: Some(true),
                min: Some(1),
                max: Some(150),
                unique_in_table: Some("groups".to_string()),
                ..CatalogEntry::default()
            },
            CatalogEntry {
                name: "groupshortname".to_string(),
                display: Some("Group Short Name".to_string()),
                required: Some(true),
                max: Some(25),
                unique_in_table: Some("groups".to_string()),
                ..CatalogEntry::default()
            },
        ])
    }

    /// Counts how often the wrapped catalog is actually queried.
    struct CountingCatalog {
        inner: StaticCatalog,
        calls: AtomicUsize,
    }

    impl RuleCatalog for CountingCatalog {
        async fn lookup(&self, name: &str) -> Result<Option<CatalogEntry>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.lookup(name).await
        }
    }

    /// Reads its entry, then parks the first lookup until released.
    struct GatedCatalog {
        display: Mutex<String>,
        gated: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    impl RuleCatalog for GatedCatalog {
        async fn lookup(&self, name: &str) -> Result<Option<CatalogEntry>, StoreError> {
            let display = self.display.lock().unwrap().clone();
            if self.gated.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(Some(CatalogEntry {
                name: name.to_string(),
                display: Some(display),
                ..CatalogEntry::default()
            }))
        }
    }

    struct FailingCatalog;

    impl RuleCatalog for FailingCatalog {
        async fn lookup(&self, _name: &str) -> Result<Option<CatalogEntry>, StoreError> {
            Err("catalog offline".into())
        }
    }

    #[tokio::test]
    async fn aliases_let_one_catalog_rule_serve_two_fields() {
        let decls = [
            RuleDecl::overlay(
                "groupname",
                RuleOverlay::new()
                    .alias("name")
                    .action(UniqueAction::Update)
                    .update_id(3),
            ),
            RuleDecl::overlay(
                "groupshortname",
                RuleOverlay::new()
                    .alias("short_name")
                    .action(UniqueAction::Update)
                    .update_id(3),
            ),
        ];
        let rules = resolve_rules(&group_catalog(), &decls).await.unwrap();

        let names: Vec<&str> = rules.names().collect();
        assert_eq!(names, ["name", "short_name"]);
        assert!(!rules.contains("groupname"));

        let name = rules.get("name").unwrap();
        assert_eq!(name.display, "Group Name");
        assert_eq!(
            name.unique,
            Some(UniqueRule::Update {
                table: "groups".to_string()
            })
        );
        assert_eq!(name.update_id, Some(3));
    }

    #[tokio::test]
    async fn bare_names_resolve_from_catalog() {
        let decls = [RuleDecl::from("groupshortname")];
        let rules = resolve_rules(&group_catalog(), &decls).await.unwrap();
        let spec = rules.get("groupshortname").unwrap();
        assert_eq!(spec.max, Some(25));
        assert_eq!(spec.required, Some(true));
    }

    #[tokio::test]
    async fn unknown_names_resolve_to_overlay_only() {
        let decls = [RuleDecl::overlay(
            "company",
            RuleOverlay::new().display("Company Name").max(75),
        )];
        let rules = resolve_rules(&group_catalog(), &decls).await.unwrap();
        let spec = rules.get("company").unwrap();
        assert_eq!(spec.display, "Company Name");
        assert_eq!(spec.max, Some(75));
        assert_eq!(spec.unique, None);
    }

    #[tokio::test]
    async fn catalog_failure_propagates() {
        let decls = [RuleDecl::from("groupname")];
        let err = resolve_rules(&FailingCatalog, &decls).await.unwrap_err();
        assert_eq!(err.to_string(), "catalog offline");
    }

    #[tokio::test]
    async fn cache_serves_repeat_lookups_until_invalidated() {
        let cached = CachedCatalog::new(CountingCatalog {
            inner: group_catalog(),
            calls: AtomicUsize::new(0),
        });

        cached.lookup("groupname").await.unwrap();
        cached.lookup("groupname").await.unwrap();
        cached.lookup("missing").await.unwrap();
        cached.lookup("missing").await.unwrap();
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);

        cached.invalidate("groupname");
        cached.lookup("groupname").await.unwrap();
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 3);

        cached.invalidate_all();
        cached.lookup("missing").await.unwrap();
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn invalidation_during_lookup_discards_the_stale_result() {
        let cached = CachedCatalog::new(GatedCatalog {
            display: Mutex::new("Old".to_string()),
            gated: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
        });

        let rename = async {
            cached.inner().entered.notified().await;
            *cached.inner().display.lock().unwrap() = "New".to_string();
            cached.invalidate("groupname");
            cached.inner().release.notify_one();
        };
        let (in_flight, ()) = tokio::join!(cached.lookup("groupname"), rename);
        assert_eq!(
            in_flight.unwrap().unwrap().display.as_deref(),
            Some("Old")
        );

        let later = cached.lookup("groupname").await.unwrap().unwrap();
        assert_eq!(later.display.as_deref(), Some("New"));
    }

    #[tokio::test]
    async fn invalidate_all_also_discards_in_flight_results() {
        let cached = CachedCatalog::new(GatedCatalog {
            display: Mutex::new("Old".to_string()),
            gated: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
        });

        let reset = async {
            cached.inner().entered.notified().await;
            *cached.inner().display.lock().unwrap() = "New".to_string();
            cached.invalidate_all();
            cached.inner().release.notify_one();
        };
        tokio::join!(cached.lookup("groupname"), reset).0.unwrap();

        let later = cached.lookup("groupname").await.unwrap().unwrap();
        assert_eq!(later.display.as_deref(), Some("New"));
    }
}
