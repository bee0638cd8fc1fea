//! Route definitions for invoices: submission, workflow actions, audit.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{audit, invoice};
use crate::state::AppState;

/// Invoice routes, nested under `/invoices`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(invoice::list_invoices).post(invoice::create_invoice))
        .route("/{invoice_id}", get(invoice::get_invoice))
        .route("/{invoice_id}/approve", post(invoice::approve_invoice))
        .route("/{invoice_id}/reject", post(invoice::reject_invoice))
        .route("/{invoice_id}/request-info", post(invoice::request_info))
        .route("/{invoice_id}/resubmit", post(invoice::resubmit_invoice))
        .route("/{invoice_id}/send-back", post(invoice::send_back_invoice))
        .route("/{invoice_id}/restore", post(invoice::restore_invoice))
        .route("/{invoice_id}/audit", get(audit::get_history))
        .route("/{invoice_id}/audit/verify", get(audit::verify_chain))
}
