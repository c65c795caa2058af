pub mod admin;
pub mod health;
pub mod users;
pub mod validation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/register                     registration (join form)
///
/// /admin/users/{id}                   per-field admin edit
/// /admin/groups                       create group
/// /admin/groups/{id}                  edit group
/// /admin/groups/{id}/hints            form hint text
///
/// /validation/rules                   list, create catalog rules
/// /validation/rules/{id}              get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/admin", admin::router())
        .nest("/validation", validation::router())
}
