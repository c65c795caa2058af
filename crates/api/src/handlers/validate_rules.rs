//! Handlers for the `/validation/rules` resource (rule catalog CRUD).
//!
//! Every write drops the affected name from the catalog cache so the next
//! form check sees the change.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roster_core::error::CoreError;
use roster_core::types::DbId;
use roster_db::models::validate_rule::{CreateValidateRule, UpdateValidateRule, ValidateRule};
use roster_db::repositories::ValidateRuleRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/validation/rules
pub async fn list_rules(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ValidateRule>>>> {
    let rules = ValidateRuleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// GET /api/v1/validation/rules/{id}
pub async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ValidateRule>>> {
    let rule = ValidateRuleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    Ok(Json(DataResponse { data: rule }))
}

/// POST /api/v1/validation/rules
///
/// Create a catalog rule. Returns the created rule with HTTP 201.
pub async fn create_rule(
    State(state): State<AppState>,
    Json(input): Json<CreateValidateRule>,
) -> AppResult<(StatusCode, Json<DataResponse<ValidateRule>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Rule name must not be empty".to_string(),
        )));
    }
    let rule = ValidateRuleRepo::create(&state.pool, &input).await?;
    state.catalog.invalidate(&rule.name);
    tracing::info!(rule_id = rule.id, rule = %rule.name, "Catalog rule created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// PUT /api/v1/validation/rules/{id}
///
/// Update a catalog rule. Returns 404 if not found.
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateValidateRule>,
) -> AppResult<Json<DataResponse<ValidateRule>>> {
    let rule = ValidateRuleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(not_found(id))?;
    state.catalog.invalidate(&rule.name);
    tracing::info!(rule_id = id, rule = %rule.name, "Catalog rule updated");
    Ok(Json(DataResponse { data: rule }))
}

/// DELETE /api/v1/validation/rules/{id}
///
/// Delete a catalog rule. Returns 204 on success, 404 if not found.
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let name = ValidateRuleRepo::delete(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    state.catalog.invalidate(&name);
    tracing::info!(rule_id = id, rule = %name, "Catalog rule deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ValidateRule",
        id,
    })
}
