//! Role-based access control extractors.
//!
//! Each extractor wraps [`ActorUser`] and rejects requests whose role does
//! not meet the minimum requirement. Workflow-level gating (which role may
//! take which transition) stays in the engine; these guard purely
//! administrative endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use apflow_core::error::CoreError;
use apflow_core::roles::Role;

use super::actor::ActorUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(actor): RequireAdmin) -> AppResult<Json<()>> {
///     // actor is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub ActorUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor = ActorUser::from_request_parts(parts, state).await?;
        if actor.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(actor))
    }
}
