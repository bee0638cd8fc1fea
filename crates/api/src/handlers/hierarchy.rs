//! Handlers for the hierarchy-administration surface.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use apflow_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::actor::ActorUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for PUT /users/{id}/manager.
#[derive(Debug, Deserialize)]
pub struct SetManagerRequest {
    /// `null` clears the assignment.
    pub manager_id: Option<DbId>,
}

/// Request body for PUT /users/{id}/reports.
#[derive(Debug, Deserialize)]
pub struct ReplaceReportsRequest {
    pub report_ids: Vec<DbId>,
}

/// PUT /api/v1/users/{user_id}/manager
///
/// Assign or clear a user's direct superior. Admin only; the parent-role
/// table is re-validated on every call.
pub async fn set_manager(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<SetManagerRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .hierarchy
        .assign_manager(user_id, input.manager_id)
        .await?;

    tracing::info!(
        user_id,
        manager_id = ?input.manager_id,
        actor_id = admin.id,
        "Manager assignment changed"
    );

    Ok(Json(DataResponse { data: serde_json::json!({ "ok": true }) }))
}

/// PUT /api/v1/users/{user_id}/reports
///
/// Replace a manager's full set of direct reports in one reconciliation.
/// Admin only.
pub async fn replace_reports(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<ReplaceReportsRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .hierarchy
        .replace_direct_reports(user_id, input.report_ids)
        .await?;

    tracing::info!(manager_id = user_id, actor_id = admin.id, "Direct reports replaced");

    Ok(Json(DataResponse { data: serde_json::json!({ "ok": true }) }))
}

/// GET /api/v1/users/{user_id}/finance-user
///
/// Preview which Finance User governs a PM, and via which strategy.
/// Useful for operators chasing broken hierarchy links.
pub async fn resolve_finance_user(
    _actor: ActorUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let resolution = state
        .engine
        .resolver()
        .resolve_finance_user_for_pm(user_id)
        .await?;
    Ok(Json(DataResponse { data: resolution }))
}
