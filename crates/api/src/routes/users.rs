//! Route definitions for the public `/users` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::registration;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /register     -> register
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(registration::register))
}
