//! Route definitions for the `/validation` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::validate_rules;
use crate::state::AppState;

/// Routes mounted at `/validation`.
///
/// ```text
/// GET    /rules        -> list_rules
/// POST   /rules        -> create_rule
/// GET    /rules/{id}   -> get_rule
/// PUT    /rules/{id}   -> update_rule
/// DELETE /rules/{id}   -> delete_rule
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/rules",
            get(validate_rules::list_rules).post(validate_rules::create_rule),
        )
        .route(
            "/rules/{id}",
            get(validate_rules::get_rule)
                .put(validate_rules::update_rule)
                .delete(validate_rules::delete_rule),
        )
}
