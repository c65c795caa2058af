//! Repository for the `validate_rules` catalog.

use roster_core::types::DbId;
use sqlx::PgPool;

use crate::models::validate_rule::{CreateValidateRule, UpdateValidateRule, ValidateRule};

/// Column list for `validate_rules` queries.
const COLUMNS: &str = "id, name, display, required, min, max, unique_in_table, match_field, \
     update_id, is_numeric, valid_email, regex, regex_display, created_at, updated_at";

/// Provides CRUD operations for catalog rules.
pub struct ValidateRuleRepo;

impl ValidateRuleRepo {
    /// List all rules ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<ValidateRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM validate_rules ORDER BY name");
        sqlx::query_as::<_, ValidateRule>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a rule by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ValidateRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM validate_rules WHERE id = $1");
        sqlx::query_as::<_, ValidateRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a rule by its catalog name (case-sensitive).
    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<ValidateRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM validate_rules WHERE name = $1");
        sqlx::query_as::<_, ValidateRule>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Create a new catalog rule, returning the inserted row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateValidateRule,
    ) -> Result<ValidateRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO validate_rules
                (name, display, required, min, max, unique_in_table, match_field,
                 update_id, is_numeric, valid_email, regex, regex_display)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ValidateRule>(&query)
            .bind(&input.name)
            .bind(&input.display)
            .bind(input.required)
            .bind(input.min)
            .bind(input.max)
            .bind(&input.unique_in_table)
            .bind(&input.match_field)
            .bind(input.update_id)
            .bind(input.is_numeric)
            .bind(input.valid_email)
            .bind(&input.regex)
            .bind(&input.regex_display)
            .fetch_one(pool)
            .await
    }

    /// Update a catalog rule. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateValidateRule,
    ) -> Result<Option<ValidateRule>, sqlx::Error> {
        let query = format!(
            "UPDATE validate_rules SET
                display = COALESCE($2, display),
                required = COALESCE($3, required),
                min = COALESCE($4, min),
                max = COALESCE($5, max),
                unique_in_table = COALESCE($6, unique_in_table),
                match_field = COALESCE($7, match_field),
                is_numeric = COALESCE($8, is_numeric),
                valid_email = COALESCE($9, valid_email),
                regex = COALESCE($10, regex),
                regex_display = COALESCE($11, regex_display)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ValidateRule>(&query)
            .bind(id)
            .bind(&input.display)
            .bind(input.required)
            .bind(input.min)
            .bind(input.max)
            .bind(&input.unique_in_table)
            .bind(&input.match_field)
            .bind(input.is_numeric)
            .bind(input.valid_email)
            .bind(&input.regex)
            .bind(&input.regex_display)
            .fetch_optional(pool)
            .await
    }

    /// Delete a catalog rule by ID, returning its name if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("DELETE FROM validate_rules WHERE id = $1 RETURNING name")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
