//! Handlers for invoice submission and workflow actions.
//!
//! Every mutation goes through the workflow engine; handlers only parse,
//! validate, and translate. One endpoint per action keeps the route table
//! self-documenting and lets clients discover the verbs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use apflow_core::error::CoreError;
use apflow_core::status::{InvoiceAction, InvoiceStatus};
use apflow_core::types::DbId;
use apflow_engine::ActionRequest;
use apflow_store::models::invoice::NewInvoice;
use apflow_store::traits::InvoiceStore;

use crate::error::{AppError, AppResult};
use crate::middleware::actor::{ActorUser, RequestProvenance};
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted free-text note on an action.
const MAX_NOTE_LENGTH: u64 = 10_000;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for invoice submission.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, max = 64))]
    pub invoice_number: String,
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    #[validate(length(equal = 3))]
    pub currency: String,
    #[validate(length(min = 1, max = 128))]
    pub project_id: String,
    /// Vendor on whose behalf the invoice is submitted. Ignored for vendor
    /// actors (they always submit for themselves); required for admin
    /// manual intake.
    pub submitted_by: Option<DbId>,
    pub assigned_pm: Option<DbId>,
}

/// Request body for every workflow action endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ActionBody {
    #[validate(length(max = MAX_NOTE_LENGTH))]
    pub notes: Option<String>,
}

fn validated<T: Validate>(input: T) -> AppResult<T> {
    input
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    Ok(input)
}

// ---------------------------------------------------------------------------
// Submission and reads
// ---------------------------------------------------------------------------

/// POST /api/v1/invoices
///
/// Submit an invoice. Vendors submit on their own behalf; admins perform
/// manual intake for a named vendor.
pub async fn create_invoice(
    actor: ActorUser,
    State(state): State<AppState>,
    Json(input): Json<CreateInvoiceRequest>,
) -> AppResult<impl IntoResponse> {
    let input = validated(input)?;

    let submitted_by = input.submitted_by.unwrap_or(actor.id);
    let new_invoice = NewInvoice {
        invoice_number: input.invoice_number,
        amount_cents: input.amount_cents,
        currency: input.currency.to_ascii_uppercase(),
        project_id: input.project_id,
        submitted_by,
        assigned_pm: input.assigned_pm,
        // The engine decides the real initial status per actor role.
        status: InvoiceStatus::Submitted,
    };

    let invoice = state.engine.submit_invoice(new_invoice, actor.id).await?;

    tracing::info!(
        invoice_id = invoice.id,
        invoice_number = %invoice.invoice_number,
        actor_id = actor.id,
        "Invoice submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: invoice })))
}

/// GET /api/v1/invoices/{invoice_id}
pub async fn get_invoice(
    _actor: ActorUser,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let invoice = state
        .invoices
        .find_by_id(invoice_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invoice",
            id: invoice_id,
        }))?;
    Ok(Json(DataResponse { data: invoice }))
}

/// GET /api/v1/invoices
pub async fn list_invoices(
    _actor: ActorUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let invoices = state.invoices.list().await?;
    Ok(Json(DataResponse { data: invoices }))
}

// ---------------------------------------------------------------------------
// Workflow actions
// ---------------------------------------------------------------------------

async fn apply(
    state: AppState,
    actor: ActorUser,
    provenance: RequestProvenance,
    invoice_id: DbId,
    action: InvoiceAction,
    body: ActionBody,
) -> AppResult<impl IntoResponse> {
    let body = validated(body)?;

    let outcome = state
        .engine
        .apply_invoice_action(ActionRequest {
            invoice_id,
            action,
            actor_id: actor.id,
            notes: body.notes,
            provenance: provenance.0,
        })
        .await?;

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/invoices/{invoice_id}/approve
pub async fn approve_invoice(
    actor: ActorUser,
    provenance: RequestProvenance,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<impl IntoResponse> {
    apply(state, actor, provenance, invoice_id, InvoiceAction::Approve, body).await
}

/// POST /api/v1/invoices/{invoice_id}/reject
pub async fn reject_invoice(
    actor: ActorUser,
    provenance: RequestProvenance,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<impl IntoResponse> {
    apply(state, actor, provenance, invoice_id, InvoiceAction::Reject, body).await
}

/// POST /api/v1/invoices/{invoice_id}/request-info
pub async fn request_info(
    actor: ActorUser,
    provenance: RequestProvenance,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<impl IntoResponse> {
    apply(
        state,
        actor,
        provenance,
        invoice_id,
        InvoiceAction::RequestInfo,
        body,
    )
    .await
}

/// POST /api/v1/invoices/{invoice_id}/resubmit
pub async fn resubmit_invoice(
    actor: ActorUser,
    provenance: RequestProvenance,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<impl IntoResponse> {
    apply(
        state,
        actor,
        provenance,
        invoice_id,
        InvoiceAction::Resubmit,
        body,
    )
    .await
}

/// POST /api/v1/invoices/{invoice_id}/send-back
pub async fn send_back_invoice(
    actor: ActorUser,
    provenance: RequestProvenance,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<impl IntoResponse> {
    apply(
        state,
        actor,
        provenance,
        invoice_id,
        InvoiceAction::SendBack,
        body,
    )
    .await
}

/// POST /api/v1/invoices/{invoice_id}/restore
pub async fn restore_invoice(
    actor: ActorUser,
    provenance: RequestProvenance,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
    Json(body): Json<ActionBody>,
) -> AppResult<impl IntoResponse> {
    apply(
        state,
        actor,
        provenance,
        invoice_id,
        InvoiceAction::Restore,
        body,
    )
    .await
}
