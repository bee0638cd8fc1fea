//! Route definitions for users and hierarchy administration.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{hierarchy, user};
use crate::state::AppState;

/// User routes, nested under `/users`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route(
            "/{user_id}",
            get(user::get_user).delete(user::deactivate_user),
        )
        .route("/{user_id}/manager", put(hierarchy::set_manager))
        .route("/{user_id}/reports", put(hierarchy::replace_reports))
        .route(
            "/{user_id}/finance-user",
            get(hierarchy::resolve_finance_user),
        )
}
