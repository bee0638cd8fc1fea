//! Shared fixture for engine integration tests.
//!
//! Builds the canonical four-level hierarchy against the in-memory stores:
//! Dana (admin) → Bob (finance) → Alice (PM, project `p-1`) → Vera (vendor).
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use apflow_core::audit::Provenance;
use apflow_core::roles::Role;
use apflow_core::status::InvoiceAction;
use apflow_core::transitions::TransitionTable;
use apflow_core::types::DbId;
use apflow_engine::{ActionRequest, WorkflowEngine};
use apflow_store::memory::{MemoryInvoiceStore, MemoryUserStore, RecordingSink};
use apflow_store::models::invoice::{Invoice, NewInvoice};
use apflow_store::models::user::{CreateUser, User};
use apflow_store::traits::UserStore;

pub struct Fixture {
    pub users: Arc<MemoryUserStore>,
    pub invoices: Arc<MemoryInvoiceStore>,
    pub sink: Arc<RecordingSink>,
    pub engine: WorkflowEngine,
    pub admin: User,
    pub finance: User,
    pub pm: User,
    pub vendor: User,
}

pub fn create_user(name: &str, role: Role, managed_by: Option<DbId>) -> CreateUser {
    CreateUser {
        display_name: name.to_string(),
        email: format!("{}@example.test", name.to_lowercase()),
        role,
        managed_by,
        assigned_projects: if role == Role::ProjectManager {
            vec!["p-1".to_string()]
        } else {
            Vec::new()
        },
    }
}

pub async fn fixture() -> Fixture {
    let users = Arc::new(MemoryUserStore::new());
    let invoices = Arc::new(MemoryInvoiceStore::new());
    let sink = Arc::new(RecordingSink::new());

    let admin = users
        .insert(create_user("Dana", Role::Admin, None))
        .await
        .unwrap();
    let finance = users
        .insert(create_user("Bob", Role::FinanceUser, Some(admin.id)))
        .await
        .unwrap();
    let pm = users
        .insert(create_user("Alice", Role::ProjectManager, Some(finance.id)))
        .await
        .unwrap();
    let vendor = users
        .insert(create_user("Vera", Role::Vendor, Some(pm.id)))
        .await
        .unwrap();

    let engine = WorkflowEngine::new(
        TransitionTable::standard(),
        users.clone(),
        invoices.clone(),
        sink.clone(),
    );

    Fixture {
        users,
        invoices,
        sink,
        engine,
        admin,
        finance,
        pm,
        vendor,
    }
}

pub fn new_invoice(vendor_id: DbId, pm_id: Option<DbId>) -> NewInvoice {
    NewInvoice {
        invoice_number: "INV-1001".to_string(),
        amount_cents: 42_500,
        currency: "USD".to_string(),
        project_id: "p-1".to_string(),
        submitted_by: vendor_id,
        assigned_pm: pm_id,
        status: apflow_core::status::InvoiceStatus::Submitted,
    }
}

/// Vendor-submitted invoice assigned to Alice, in `Submitted`.
pub async fn submitted_invoice(f: &Fixture) -> Invoice {
    f.engine
        .submit_invoice(new_invoice(f.vendor.id, Some(f.pm.id)), f.vendor.id)
        .await
        .unwrap()
}

pub fn request(invoice_id: DbId, action: InvoiceAction, actor_id: DbId) -> ActionRequest {
    ActionRequest {
        invoice_id,
        action,
        actor_id,
        notes: None,
        provenance: Provenance::default(),
    }
}
