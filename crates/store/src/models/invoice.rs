//! Invoice entity model and DTOs.

use serde::{Deserialize, Serialize};

use apflow_core::approval::ApprovalRecord;
use apflow_core::audit::AuditEntry;
use apflow_core::status::InvoiceStatus;
use apflow_core::types::{DbId, Timestamp};

/// An invoice moving through the approval pipeline.
///
/// `status`, `pm_approval`, and `finance_approval` are written only by the
/// workflow engine's transition routine, always together. The audit trail
/// is embedded so a status change and its audit entry commit as one record
/// write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: DbId,
    pub invoice_number: String,
    pub amount_cents: i64,
    pub currency: String,
    pub project_id: String,
    /// The submitting vendor.
    pub submitted_by: DbId,
    pub status: InvoiceStatus,
    pub assigned_pm: Option<DbId>,
    /// Resolved automatically by the hierarchy resolver -- never entered by
    /// a human.
    pub assigned_finance_user: Option<DbId>,
    /// Set when finance-user resolution failed; the invoice proceeds but
    /// operators must assign routing by hand.
    pub needs_manual_routing: bool,
    pub pm_approval: ApprovalRecord,
    pub finance_approval: ApprovalRecord,
    pub audit_trail: Vec<AuditEntry>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an invoice.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub amount_cents: i64,
    pub currency: String,
    pub project_id: String,
    pub submitted_by: DbId,
    pub assigned_pm: Option<DbId>,
    /// `Submitted` for vendor submissions, `PendingPmApproval` for manual
    /// intake. The engine enforces which callers may use which.
    pub status: InvoiceStatus,
}
