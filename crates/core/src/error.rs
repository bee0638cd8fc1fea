use crate::status::{InvoiceAction, InvoiceStatus};
use crate::types::DbId;

/// Domain-level error type shared by every layer.
///
/// All workflow rejections are semantic, not transient: none of them are
/// retried automatically, and callers must be able to distinguish the kinds
/// (an `Unauthorized` vendor is a different bug than an `InvalidTransition`
/// race).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The actor's role may never invoke this action, in any state.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The actor's role is acceptable but this specific invoice is not
    /// theirs to act on (PM assignment check).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The role is permitted generally, but the invoice's current status
    /// forbids this move. Also covers stale-state races: the status moved
    /// between the caller's read and the engine's re-check.
    #[error("Invalid transition: cannot {action} an invoice in {status}: {reason}")]
    InvalidTransition {
        status: InvoiceStatus,
        action: InvoiceAction,
        reason: String,
    },

    /// A hierarchy edit violates the fixed parent-role table.
    #[error("Invalid assignment: {0}")]
    InvalidAssignment(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
