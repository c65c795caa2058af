//! Route definitions for the `/admin` resources.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin_groups, admin_users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// PUT    /users/{id}          -> update_user
/// POST   /groups              -> create_group
/// PUT    /groups/{id}         -> update_group
/// GET    /groups/{id}/hints   -> group_hints
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}", put(admin_users::update_user))
        .route("/groups", post(admin_groups::create_group))
        .route("/groups/{id}", put(admin_groups::update_group))
        .route("/groups/{id}/hints", get(admin_groups::group_hints))
}
