//! Apflow API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes) so
//! integration tests and the binary entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

use std::sync::Arc;

use apflow_core::roles::Role;
use apflow_core::transitions::TransitionTable;
use apflow_engine::{AuditRecorder, HierarchyAdmin, WorkflowEngine};
use apflow_store::memory::{LogSink, MemoryInvoiceStore, MemoryUserStore};
use apflow_store::models::user::CreateUser;
use apflow_store::traits::{InvoiceStore, NotificationSink, UserStore};

use crate::config::ServerConfig;
use crate::state::AppState;

/// Wire an [`AppState`] from explicit collaborators.
pub fn build_state(
    config: ServerConfig,
    users: Arc<dyn UserStore>,
    invoices: Arc<dyn InvoiceStore>,
    sink: Arc<dyn NotificationSink>,
) -> AppState {
    let engine = Arc::new(WorkflowEngine::new(
        TransitionTable::standard(),
        Arc::clone(&users),
        Arc::clone(&invoices),
        sink,
    ));
    let hierarchy = HierarchyAdmin::new(Arc::clone(&users));
    let recorder = AuditRecorder::new(Arc::clone(&invoices));

    AppState {
        engine,
        users,
        invoices,
        hierarchy,
        recorder,
        config: Arc::new(config),
    }
}

/// Wire an [`AppState`] over the in-memory reference backends, creating a
/// bootstrap admin when the user store is empty (someone has to be able to
/// provision everyone else).
pub async fn build_memory_state(config: ServerConfig) -> AppState {
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let invoices: Arc<dyn InvoiceStore> = Arc::new(MemoryInvoiceStore::new());
    let sink: Arc<dyn NotificationSink> = Arc::new(LogSink);

    if users.list_all().await.expect("memory store is infallible").is_empty() {
        let admin = users
            .insert(CreateUser {
                display_name: config.bootstrap_admin_name.clone(),
                email: config.bootstrap_admin_email.clone(),
                role: Role::Admin,
                managed_by: None,
                assigned_projects: Vec::new(),
            })
            .await
            .expect("memory store is infallible");
        tracing::info!(admin_id = admin.id, "Bootstrap admin created");
    }

    build_state(config, users, invoices, sink)
}
