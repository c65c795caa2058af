//! Field validation engine.
//!
//! Provides rule types, catalog resolution, the check executor, hint text
//! generation, and error reporting. The rule catalog and the record store
//! used for uniqueness checks are injected through [`RuleCatalog`] and
//! [`RecordStore`], so nothing here depends on a live database.

pub mod catalog;
pub mod describe;
pub mod error;
pub mod evaluator;
pub mod input;
pub mod report;
pub mod rules;
pub mod sanitize;
pub mod store;

pub use catalog::{resolve_rules, CachedCatalog, RuleCatalog, StaticCatalog};
pub use error::{RuleError, StoreError};
pub use evaluator::FieldValidator;
pub use input::FormInput;
pub use report::{ValidationError, ValidationResult};
pub use rules::{
    Attribute, CatalogEntry, Override, RuleDecl, RuleOverlay, RuleSet, RuleSpec, UniqueAction,
    UniqueRule,
};
pub use store::RecordStore;
