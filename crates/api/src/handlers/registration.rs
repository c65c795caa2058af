//! Handler for self-service account registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use roster_core::error::CoreError;
use roster_core::validation::{FieldValidator, FormInput};
use roster_db::models::user::{CreateUser, UserResponse};
use roster_db::repositories::UserRepo;
use serde_json::{Map, Value};

use super::{cleaned, cleaned_opt};
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::forms;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/users/register
///
/// Check the join form, then store the user with an Argon2id password hash.
/// Returns 201 with the created user, or 422 listing every broken rule.
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<Map<String, Value>>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let validator =
        FieldValidator::from_catalog(&state.records, state.catalog.as_ref(), &forms::join_rules())
            .await?;
    let result = validator.check(&form).await?;
    if !result.passed() {
        tracing::debug!(errors = result.errors().len(), "Registration rejected");
        return Err(AppError::FormRejected(result.into_errors()));
    }

    // The password is hashed as typed (trimmed), never HTML-escaped.
    let password = form
        .field("password")
        .map(|p| p.trim().to_string())
        .unwrap_or_default();
    let password_hash =
        hash_password(&password).map_err(|e| AppError::Core(CoreError::Internal(e.to_string())))?;

    let input = CreateUser {
        username: cleaned(&form, "username"),
        email: cleaned(&form, "email"),
        fname: cleaned(&form, "fname"),
        lname: cleaned(&form, "lname"),
        company: cleaned_opt(&form, "company"),
        password_hash,
    };
    let user = UserRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}
