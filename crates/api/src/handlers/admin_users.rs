//! Handler for the admin user editor.
//!
//! Each submitted field that differs from the stored value is validated on
//! its own. Fields that pass are saved, fields that fail are reported, and
//! one bad field never blocks the others. The `active` flag (block or
//! unblock) carries no rules and is applied whenever it changes.

use axum::extract::{Path, State};
use axum::Json;
use roster_core::error::CoreError;
use roster_core::types::DbId;
use roster_core::validation::{FieldValidator, ValidationError, ValidationResult};
use roster_db::models::user::{UpdateUser, User, UserResponse};
use roster_db::repositories::UserRepo;
use serde::Serialize;
use serde_json::{Map, Value};

use super::cleaned;
use crate::error::{AppError, AppResult};
use crate::forms;
use crate::response::DataResponse;
use crate::state::AppState;

/// Outcome of an admin edit: the user as now stored plus per-field results.
#[derive(Debug, Serialize)]
pub struct AdminUserUpdate {
    pub user: UserResponse,
    pub successes: Vec<String>,
    pub errors: Vec<ValidationError>,
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(form): Json<Map<String, Value>>,
) -> AppResult<Json<DataResponse<AdminUserUpdate>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let mut changes = UpdateUser::default();
    let mut successes = Vec::new();
    let mut errors = ValidationResult::new();

    for field in forms::ADMIN_USER_FIELDS {
        if !form.contains_key(field) {
            continue;
        }
        let value = cleaned(&form, field);
        if value == current_value(&user, field) {
            continue;
        }
        let Some(decl) = forms::admin_user_rule(field, id) else {
            continue;
        };

        let validator =
            FieldValidator::from_catalog(&state.records, state.catalog.as_ref(), &[decl]).await?;
        let result = validator.check(&form).await?;
        if !result.passed() {
            errors.extend(result.into_errors());
            continue;
        }

        let label = validator
            .rules()
            .get(field)
            .map_or(field, |spec| spec.display.as_str());
        successes.push(format!("{label} updated."));
        match field {
            "username" => changes.username = Some(value),
            "fname" => changes.fname = Some(value),
            "lname" => changes.lname = Some(value),
            "email" => changes.email = Some(value),
            _ => {}
        }
    }

    if let Some(active) = form.get("active").and_then(Value::as_bool) {
        if active != user.is_active {
            changes.is_active = Some(active);
            successes.push("Active status updated.".to_string());
        }
    }

    let user = if successes.is_empty() {
        user
    } else {
        UserRepo::update(&state.pool, id, &changes)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?
    };
    tracing::info!(
        user_id = id,
        updated = successes.len(),
        rejected = errors.errors().len(),
        "Admin user edit processed"
    );

    Ok(Json(DataResponse {
        data: AdminUserUpdate {
            user: UserResponse::from(user),
            successes,
            errors: errors.into_errors(),
        },
    }))
}

fn current_value<'u>(user: &'u User, field: &str) -> &'u str {
    match field {
        "username" => &user.username,
        "fname" => &user.fname,
        "lname" => &user.lname,
        "email" => &user.email,
        _ => "",
    }
}
