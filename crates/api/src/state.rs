use std::sync::Arc;

use apflow_engine::{AuditRecorder, HierarchyAdmin, WorkflowEngine};
use apflow_store::traits::{InvoiceStore, UserStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The workflow engine -- the only path that mutates invoices.
    pub engine: Arc<WorkflowEngine>,
    /// User lookup for actor extraction and user administration.
    pub users: Arc<dyn UserStore>,
    /// Invoice reads. Writes only ever happen through the engine.
    pub invoices: Arc<dyn InvoiceStore>,
    /// Hierarchy administration surface.
    pub hierarchy: HierarchyAdmin,
    /// Audit trail reads.
    pub recorder: AuditRecorder,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
