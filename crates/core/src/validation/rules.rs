//! Rule declaration, catalog, and resolved rule types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

/// A named, reusable rule template from the rule catalog.
///
/// Every attribute is optional; absent attributes contribute no default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub display: Option<String>,
    pub required: Option<bool>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    /// Backing table for duplicate lookups.
    pub unique_in_table: Option<String>,
    /// Name of another field whose value must be identical.
    pub match_field: Option<String>,
    pub update_id: Option<DbId>,
    pub is_numeric: Option<bool>,
    pub valid_email: Option<bool>,
    pub regex: Option<String>,
    pub regex_display: Option<String>,
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

/// Caller override of a single catalog attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Override<T> {
    /// Use the catalog value, if any.
    #[default]
    Inherit,
    /// Use this value regardless of the catalog.
    Set(T),
    /// Drop the attribute even when the catalog defines it.
    Suppress,
}

impl<T: Clone> Override<T> {
    /// Merge this override with the catalog's value for the same attribute.
    pub fn resolve(&self, catalog: Option<T>) -> Option<T> {
        match self {
            Self::Inherit => catalog,
            Self::Set(value) => Some(value.clone()),
            Self::Suppress => None,
        }
    }
}

impl<T> From<T> for Override<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

/// Which uniqueness semantics a `unique` attribute resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueAction {
    /// Any existing row is a duplicate.
    Add,
    /// Rows other than the one being edited are duplicates.
    Update,
}

/// Attributes that can be overridden or suppressed in a [`RuleOverlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Display,
    Required,
    Min,
    Max,
    Unique,
    Matches,
    UpdateId,
    IsNumeric,
    ValidEmail,
    Regex,
    RegexDisplay,
}

/// Per-call attribute overlay applied on top of a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOverlay {
    pub display: Override<String>,
    pub required: Override<bool>,
    pub min: Override<usize>,
    pub max: Override<usize>,
    pub unique: Override<String>,
    pub matches: Override<String>,
    pub update_id: Override<DbId>,
    pub is_numeric: Override<bool>,
    pub valid_email: Override<bool>,
    pub regex: Override<String>,
    pub regex_display: Override<String>,
    /// Selects add/update semantics for `unique`.
    pub action: Option<UniqueAction>,
    /// Field name the resolved rule is stored under, when it differs from
    /// the catalog rule name.
    pub alias: Option<String>,
}

impl RuleOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(mut self, label: impl Into<String>) -> Self {
        self.display = Override::Set(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Override::Set(required);
        self
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min = Override::Set(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max = Override::Set(max);
        self
    }

    /// Duplicate lookup in `table`. Accepts the compact `"table,id"` form
    /// for update checks.
    pub fn unique(mut self, table: impl Into<String>) -> Self {
        self.unique = Override::Set(table.into());
        self
    }

    pub fn matches(mut self, field: impl Into<String>) -> Self {
        self.matches = Override::Set(field.into());
        self
    }

    pub fn update_id(mut self, id: DbId) -> Self {
        self.update_id = Override::Set(id);
        self
    }

    pub fn numeric(mut self) -> Self {
        self.is_numeric = Override::Set(true);
        self
    }

    pub fn email(mut self) -> Self {
        self.valid_email = Override::Set(true);
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>, display: impl Into<String>) -> Self {
        self.regex = Override::Set(pattern.into());
        self.regex_display = Override::Set(display.into());
        self
    }

    pub fn action(mut self, action: UniqueAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn alias(mut self, field: impl Into<String>) -> Self {
        self.alias = Some(field.into());
        self
    }

    /// Drop `attribute` from the resolved rule even if the catalog sets it.
    pub fn suppress(mut self, attribute: Attribute) -> Self {
        match attribute {
            Attribute::Display => self.display = Override::Suppress,
            Attribute::Required => self.required = Override::Suppress,
            Attribute::Min => self.min = Override::Suppress,
            Attribute::Max => self.max = Override::Suppress,
            Attribute::Unique => self.unique = Override::Suppress,
            Attribute::Matches => self.matches = Override::Suppress,
            Attribute::UpdateId => self.update_id = Override::Suppress,
            Attribute::IsNumeric => self.is_numeric = Override::Suppress,
            Attribute::ValidEmail => self.valid_email = Override::Suppress,
            Attribute::Regex => self.regex = Override::Suppress,
            Attribute::RegexDisplay => self.regex_display = Override::Suppress,
        }
        self
    }
}

/// One entry of a caller-supplied rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDecl {
    /// Use the catalog rule of this name verbatim.
    Name(String),
    /// Look up the catalog rule `name` and apply `overlay` on top.
    Overlay { name: String, overlay: RuleOverlay },
}

impl RuleDecl {
    pub fn overlay(name: impl Into<String>, overlay: RuleOverlay) -> Self {
        Self::Overlay {
            name: name.into(),
            overlay,
        }
    }

    /// Catalog lookup key.
    pub fn lookup_key(&self) -> &str {
        match self {
            Self::Name(name) | Self::Overlay { name, .. } => name,
        }
    }
}

impl From<&str> for RuleDecl {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

// ---------------------------------------------------------------------------
// Resolved rules
// ---------------------------------------------------------------------------

/// Resolved uniqueness requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum UniqueRule {
    /// Plain `unique`: any existing row conflicts.
    Any { table: String },
    /// `unique_add`: any existing row conflicts.
    Add { table: String },
    /// `unique_update`: rows other than the edited one conflict. `table` may
    /// carry the excluded id in `"table,id"` form.
    Update { table: String },
}

impl UniqueRule {
    fn from_action(table: String, action: Option<UniqueAction>) -> Self {
        match action {
            None => Self::Any { table },
            Some(UniqueAction::Add) => Self::Add { table },
            Some(UniqueAction::Update) => Self::Update { table },
        }
    }
}

/// Fully resolved rule for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Human label used in every message.
    pub display: String,
    pub required: Option<bool>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub unique: Option<UniqueRule>,
    pub update_id: Option<DbId>,
    pub matches: Option<String>,
    pub regex: Option<String>,
    pub regex_display: Option<String>,
    pub is_numeric: bool,
    pub valid_email: bool,
}

impl RuleSpec {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// Merge one declaration with its catalog entry.
///
/// Returns the final field name (the alias when one is given) and the
/// resolved spec.
pub fn merge(decl: &RuleDecl, catalog: Option<&CatalogEntry>) -> (String, RuleSpec) {
    let default_overlay = RuleOverlay::default();
    let (name, overlay) = match decl {
        RuleDecl::Name(name) => (name.as_str(), &default_overlay),
        RuleDecl::Overlay { name, overlay } => (name.as_str(), overlay),
    };
    let entry = catalog.cloned().unwrap_or_default();

    let field = overlay.alias.clone().unwrap_or_else(|| name.to_string());
    let display = overlay
        .display
        .resolve(entry.display)
        .unwrap_or_else(|| field.clone());

    let spec = RuleSpec {
        display,
        required: overlay.required.resolve(entry.required),
        min: overlay.min.resolve(entry.min),
        max: overlay.max.resolve(entry.max),
        unique: overlay
            .unique
            .resolve(entry.unique_in_table)
            .map(|table| UniqueRule::from_action(table, overlay.action)),
        update_id: overlay.update_id.resolve(entry.update_id),
        matches: overlay.matches.resolve(entry.match_field),
        regex: overlay.regex.resolve(entry.regex),
        regex_display: overlay.regex_display.resolve(entry.regex_display),
        is_numeric: overlay.is_numeric.resolve(entry.is_numeric).unwrap_or(false),
        valid_email: overlay
            .valid_email
            .resolve(entry.valid_email)
            .unwrap_or(false),
    };

    (field, spec)
}

/// Resolved rules keyed by final field name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    fields: IndexMap<String, RuleSpec>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve declarations without a catalog: overlays are taken as-is.
    pub fn inline<I>(decls: I) -> Self
    where
        I: IntoIterator<Item = RuleDecl>,
    {
        decls
            .into_iter()
            .map(|decl| merge(&decl, None))
            .collect()
    }

    /// Insert or replace the rule for `field`. A replaced rule keeps its
    /// original position.
    pub fn insert(&mut self, field: impl Into<String>, spec: RuleSpec) {
        self.fields.insert(field.into(), spec);
    }

    pub fn get(&self, field: &str) -> Option<&RuleSpec> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, RuleSpec)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, RuleSpec)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (field, spec) in iter {
            set.insert(field, spec);
        }
        set
    }
}
