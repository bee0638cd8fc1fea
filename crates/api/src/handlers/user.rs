//! Handlers for user provisioning and lookup.
//!
//! Role strings are normalized into the canonical [`Role`] enum right
//! here at the boundary -- nothing past this module handles a raw role
//! string. Users are never physically deleted; `DELETE` soft-deactivates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use apflow_core::error::CoreError;
use apflow_core::roles::{validate_assignment, Role};
use apflow_core::types::DbId;
use apflow_store::models::user::CreateUser;

use crate::error::{AppError, AppResult};
use crate::middleware::actor::ActorUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for user provisioning. `role` accepts any known spelling
/// ("PM", "Project Manager", "project_manager", ...).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 128))]
    pub display_name: String,
    #[validate(email)]
    pub email: String,
    pub role: String,
    pub managed_by: Option<DbId>,
    #[serde(default)]
    pub assigned_projects: Vec<String>,
}

/// POST /api/v1/users
///
/// Provision a user. Admin only. If `managed_by` is given, the parent-role
/// table is enforced before the user is created.
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let role: Role = input.role.parse()?;

    if let Some(manager_id) = input.managed_by {
        let manager = state
            .users
            .find_by_id(manager_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: manager_id,
            })?;
        validate_assignment(role, manager.role)?;
    }

    let user = state
        .users
        .insert(CreateUser {
            display_name: input.display_name,
            email: input.email,
            role,
            managed_by: input.managed_by,
            assigned_projects: input.assigned_projects,
        })
        .await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = admin.id,
        "User provisioned"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/users
pub async fn list_users(
    _actor: ActorUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = state.users.list_all().await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{user_id}
pub async fn get_user(
    _actor: ActorUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{user_id}
///
/// Soft-deactivate. Admin only. Users are never physically removed while
/// invoices reference them.
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deactivated = state.users.deactivate(user_id).await?;

    tracing::info!(user_id, deactivated, actor_id = admin.id, "User deactivated");

    Ok(Json(DataResponse {
        data: serde_json::json!({ "deactivated": deactivated }),
    }))
}
