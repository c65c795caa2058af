//! Handlers for the admin group editor.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roster_core::error::CoreError;
use roster_core::types::DbId;
use roster_core::validation::FieldValidator;
use roster_db::models::group::{CreateGroup, Group, UpdateGroup};
use roster_db::repositories::GroupRepo;
use serde::Serialize;
use serde_json::{Map, Value};

use super::cleaned;
use crate::error::{AppError, AppResult};
use crate::forms;
use crate::response::DataResponse;
use crate::state::AppState;

/// Hint text shown next to each group form input.
#[derive(Debug, Serialize)]
pub struct GroupHints {
    pub name: String,
    pub short_name: String,
}

/// POST /api/v1/admin/groups
///
/// Create a group. Name and short name must not already exist.
pub async fn create_group(
    State(state): State<AppState>,
    Json(form): Json<Map<String, Value>>,
) -> AppResult<(StatusCode, Json<DataResponse<Group>>)> {
    let validator = FieldValidator::from_catalog(
        &state.records,
        state.catalog.as_ref(),
        &forms::new_group_rules(),
    )
    .await?;
    let result = validator.check(&form).await?;
    if !result.passed() {
        return Err(AppError::FormRejected(result.into_errors()));
    }

    let input = CreateGroup {
        name: cleaned(&form, "name"),
        short_name: cleaned(&form, "short_name"),
        grouptype_id: form.get("grouptype_id").and_then(Value::as_i64),
    };
    let group = GroupRepo::create(&state.pool, &input).await?;
    tracing::info!(group_id = group.id, name = %group.name, "Group created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// PUT /api/v1/admin/groups/{id}
///
/// Rename a group. The group's own current names do not count as duplicates.
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(form): Json<Map<String, Value>>,
) -> AppResult<Json<DataResponse<Group>>> {
    ensure_group_exists(&state, id).await?;

    let validator = FieldValidator::from_catalog(
        &state.records,
        state.catalog.as_ref(),
        &forms::group_rules(id),
    )
    .await?;
    let result = validator.check(&form).await?;
    if !result.passed() {
        tracing::debug!(group_id = id, errors = result.errors().len(), "Group edit rejected");
        return Err(AppError::FormRejected(result.into_errors()));
    }

    let input = UpdateGroup {
        name: Some(cleaned(&form, "name")),
        short_name: Some(cleaned(&form, "short_name")),
        grouptype_id: form.get("grouptype_id").and_then(Value::as_i64),
    };
    let group = GroupRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Group", id }))?;
    tracing::info!(group_id = id, "Group updated");

    Ok(Json(DataResponse { data: group }))
}

/// GET /api/v1/admin/groups/{id}/hints
pub async fn group_hints(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<GroupHints>>> {
    ensure_group_exists(&state, id).await?;

    let validator = FieldValidator::from_catalog(
        &state.records,
        state.catalog.as_ref(),
        &forms::group_rules(id),
    )
    .await?;

    Ok(Json(DataResponse {
        data: GroupHints {
            name: validator.describe(&["name"]),
            short_name: validator.describe(&["short_name"]),
        },
    }))
}

async fn ensure_group_exists(state: &AppState, id: DbId) -> AppResult<()> {
    GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Group", id }))?;
    Ok(())
}
