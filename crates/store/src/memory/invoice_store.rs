//! In-memory invoice store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use apflow_core::approval::ApprovalRecord;
use apflow_core::error::CoreError;
use apflow_core::types::DbId;

use crate::models::invoice::{Invoice, NewInvoice};
use crate::traits::InvoiceStore;

/// Reference [`InvoiceStore`] backed by a `HashMap` behind an async
/// `RwLock`. `update` replaces the whole record, so a status change and
/// its audit entry land together.
#[derive(Debug, Default)]
pub struct MemoryInvoiceStore {
    invoices: RwLock<HashMap<DbId, Invoice>>,
    next_id: AtomicI64,
}

impl MemoryInvoiceStore {
    pub fn new() -> Self {
        Self {
            invoices: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Invoice>, CoreError> {
        Ok(self.invoices.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>, CoreError> {
        let mut invoices: Vec<Invoice> = self.invoices.read().await.values().cloned().collect();
        invoices.sort_by_key(|i| i.id);
        Ok(invoices)
    }

    async fn insert(&self, input: NewInvoice) -> Result<Invoice, CoreError> {
        let now = chrono::Utc::now();
        let invoice = Invoice {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            invoice_number: input.invoice_number,
            amount_cents: input.amount_cents,
            currency: input.currency,
            project_id: input.project_id,
            submitted_by: input.submitted_by,
            status: input.status,
            assigned_pm: input.assigned_pm,
            assigned_finance_user: None,
            needs_manual_routing: false,
            pm_approval: ApprovalRecord::pending(),
            finance_approval: ApprovalRecord::pending(),
            audit_trail: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.invoices
            .write()
            .await
            .insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn update(&self, mut invoice: Invoice) -> Result<Invoice, CoreError> {
        let mut invoices = self.invoices.write().await;
        if !invoices.contains_key(&invoice.id) {
            return Err(CoreError::NotFound {
                entity: "Invoice",
                id: invoice.id,
            });
        }
        invoice.updated_at = chrono::Utc::now();
        invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }
}
