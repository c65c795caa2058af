//! Models for the validation rule catalog.

use roster_core::types::{DbId, Timestamp};
use roster_core::validation::CatalogEntry;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `validate_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ValidateRule {
    pub id: DbId,
    pub name: String,
    pub display: Option<String>,
    pub required: Option<bool>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub unique_in_table: Option<String>,
    pub match_field: Option<String>,
    pub update_id: Option<DbId>,
    pub is_numeric: Option<bool>,
    pub valid_email: Option<bool>,
    pub regex: Option<String>,
    pub regex_display: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ValidateRule> for CatalogEntry {
    fn from(row: ValidateRule) -> Self {
        Self {
            name: row.name,
            display: row.display,
            required: row.required,
            // Negative bounds are rejected by a CHECK constraint; treat any
            // that slip through as unbounded.
            min: row.min.and_then(|v| usize::try_from(v).ok()),
            max: row.max.and_then(|v| usize::try_from(v).ok()),
            unique_in_table: row.unique_in_table,
            match_field: row.match_field,
            update_id: row.update_id,
            is_numeric: row.is_numeric,
            valid_email: row.valid_email,
            regex: row.regex,
            regex_display: row.regex_display,
        }
    }
}

/// DTO for creating a catalog rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateValidateRule {
    pub name: String,
    pub display: Option<String>,
    pub required: Option<bool>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub unique_in_table: Option<String>,
    pub match_field: Option<String>,
    pub update_id: Option<DbId>,
    pub is_numeric: Option<bool>,
    pub valid_email: Option<bool>,
    pub regex: Option<String>,
    pub regex_display: Option<String>,
}

/// DTO for updating a catalog rule. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateValidateRule {
    pub display: Option<String>,
    pub required: Option<bool>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub unique_in_table: Option<String>,
    pub match_field: Option<String>,
    pub is_numeric: Option<bool>,
    pub valid_email: Option<bool>,
    pub regex: Option<String>,
    pub regex_display: Option<String>,
}
