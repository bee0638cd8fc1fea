//! Handlers for audit trail reads and integrity verification.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use apflow_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::actor::ActorUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/invoices/{invoice_id}/audit
///
/// The invoice's audit trail, oldest entry first.
pub async fn get_history(
    _actor: ActorUser,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = state.recorder.history(invoice_id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/invoices/{invoice_id}/audit/verify
///
/// Walk the trail's integrity-hash chain. Admin only.
pub async fn verify_chain(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let check = state.recorder.verify(invoice_id).await?;
    Ok(Json(DataResponse { data: check }))
}
