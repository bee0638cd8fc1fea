//! Collaborator seams: the stores and sinks the engine consumes.
//!
//! Persistence and transport technology are collaborator concerns -- any
//! backend that satisfies these traits plugs in. The in-memory
//! implementations under [`crate::memory`] are the reference backends used
//! by tests, tooling, and the bundled API binary.

use async_trait::async_trait;

use apflow_core::error::CoreError;
use apflow_core::notification::NotificationInstruction;
use apflow_core::roles::Role;
use apflow_core::types::DbId;

use crate::models::invoice::{Invoice, NewInvoice};
use crate::models::user::{CreateUser, User};

/// A batch of hierarchy edits applied as one atomic operation.
///
/// Bulk reconciliation must never partially apply: a child may not end up
/// pointing at a manager that no longer lists them, nor the reverse.
#[derive(Debug, Clone, Default)]
pub struct HierarchyUpdate {
    /// `(user, new manager)` -- `None` unassigns.
    pub set_managed_by: Vec<(DbId, Option<DbId>)>,
    /// `(manager, full replacement report list)`.
    pub set_direct_reports: Vec<(DbId, Vec<DbId>)>,
}

impl HierarchyUpdate {
    pub fn is_empty(&self) -> bool {
        self.set_managed_by.is_empty() && self.set_direct_reports.is_empty()
    }
}

/// User lookup and hierarchy persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError>;

    /// Active and inactive users of the given role.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, CoreError>;

    async fn list_all(&self) -> Result<Vec<User>, CoreError>;

    async fn insert(&self, input: CreateUser) -> Result<User, CoreError>;

    /// Soft-deactivate. Returns `true` if the user existed and was active.
    async fn deactivate(&self, id: DbId) -> Result<bool, CoreError>;

    /// Apply every edit in `update`, atomically. Fails without effect if
    /// any referenced user is unknown.
    async fn apply_hierarchy_update(&self, update: HierarchyUpdate) -> Result<(), CoreError>;
}

/// Invoice read/write store.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Invoice>, CoreError>;

    async fn list(&self) -> Result<Vec<Invoice>, CoreError>;

    async fn insert(&self, input: NewInvoice) -> Result<Invoice, CoreError>;

    /// Whole-record write (last-writer-wins on a single invoice). Status,
    /// approval records, and the appended audit entry arrive together in
    /// one call so they commit as a unit.
    async fn update(&self, invoice: Invoice) -> Result<Invoice, CoreError>;
}

/// Fire-and-forget notification sink consumed by the external dispatcher.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, instruction: NotificationInstruction) -> Result<(), CoreError>;
}
