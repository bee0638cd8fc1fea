//! Actor extraction for Axum handlers.
//!
//! Authentication mechanics live in the upstream gateway; requests arrive
//! with a verified `x-actor-id` header naming the acting user. The
//! extractor loads the user and hands handlers a canonical [`Role`] -- no
//! role strings cross this boundary.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use apflow_core::audit::Provenance;
use apflow_core::error::CoreError;
use apflow_core::roles::Role;
use apflow_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The acting user, resolved from the `x-actor-id` header.
///
/// Use as an extractor parameter in any handler that requires an actor:
///
/// ```ignore
/// async fn my_handler(actor: ActorUser) -> AppResult<Json<()>> {
///     tracing::info!(actor_id = actor.id, role = %actor.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ActorUser {
    pub id: DbId,
    pub display_name: String,
    pub role: Role,
}

impl FromRequestParts<AppState> for ActorUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-actor-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-actor-id header".into()))
            })?;

        let actor_id: DbId = header.trim().parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "x-actor-id must be a numeric user id".into(),
            ))
        })?;

        let user = state
            .users
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Unknown actor id {actor_id}"
                )))
            })?;

        if !user.is_active {
            return Err(AppError::Core(CoreError::Unauthorized(format!(
                "User {} is deactivated",
                user.display_name
            ))));
        }

        Ok(ActorUser {
            id: user.id,
            display_name: user.display_name,
            role: user.role,
        })
    }
}

/// Request provenance (client address, user agent) captured into audit
/// entries. Infallible: missing headers yield `None`s.
#[derive(Debug, Clone)]
pub struct RequestProvenance(pub Provenance);

impl<S: Send + Sync> FromRequestParts<S> for RequestProvenance {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string());
        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        Ok(RequestProvenance(Provenance {
            ip_address,
            user_agent,
        }))
    }
}
