//! The audit recorder's read side: history and chain verification.
//!
//! Appending happens inside the workflow engine's single invoice write, so
//! a status change and its entry commit together by construction. This
//! module covers the query contract.

use std::sync::Arc;

use apflow_core::audit::{verify_chain, AuditEntry, ChainCheck};
use apflow_core::error::CoreError;
use apflow_core::types::DbId;
use apflow_store::traits::InvoiceStore;

/// Read access to invoice audit trails.
#[derive(Clone)]
pub struct AuditRecorder {
    invoices: Arc<dyn InvoiceStore>,
}

impl AuditRecorder {
    pub fn new(invoices: Arc<dyn InvoiceStore>) -> Self {
        Self { invoices }
    }

    /// The invoice's full trail, oldest entry first. Idempotent: two calls
    /// without an intervening transition return identical sequences.
    pub async fn history(&self, invoice_id: DbId) -> Result<Vec<AuditEntry>, CoreError> {
        let invoice = self
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Invoice",
                id: invoice_id,
            })?;
        Ok(invoice.audit_trail)
    }

    /// Walk the trail's integrity-hash chain and report the first break,
    /// if any.
    pub async fn verify(&self, invoice_id: DbId) -> Result<ChainCheck, CoreError> {
        let trail = self.history(invoice_id).await?;
        Ok(verify_chain(&trail))
    }
}
