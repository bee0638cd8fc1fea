//! Per-stage approval records.
//!
//! An invoice carries one record for the PM stage and one for the finance
//! stage. The records are the *cause* of a status change, never parallel
//! state: only the workflow engine writes them, and always together with
//! the status they imply.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::status::ApprovalState;
use crate::types::{DbId, Timestamp};

/// The decision state of one review stage (PM or finance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub status: ApprovalState,
    pub approved_by: Option<DbId>,
    pub approved_by_role: Option<Role>,
    pub approved_at: Option<Timestamp>,
    pub notes: Option<String>,
}

impl ApprovalRecord {
    /// A fresh, undecided record.
    pub fn pending() -> Self {
        Self {
            status: ApprovalState::Pending,
            approved_by: None,
            approved_by_role: None,
            approved_at: None,
            notes: None,
        }
    }

    /// Record a decision by `actor` at `at`.
    pub fn decide(
        state: ApprovalState,
        actor_id: DbId,
        actor_role: Role,
        at: Timestamp,
        notes: Option<String>,
    ) -> Self {
        Self {
            status: state,
            approved_by: Some(actor_id),
            approved_by_role: Some(actor_role),
            approved_at: Some(at),
            notes,
        }
    }

    /// Reset to pending, discarding the previous decision. Used by
    /// send-back, restore, and the info-request return edges.
    pub fn reset(&mut self) {
        *self = Self::pending();
    }
}

impl Default for ApprovalRecord {
    fn default() -> Self {
        Self::pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_record_carries_no_actor() {
        let record = ApprovalRecord::pending();
        assert_eq!(record.status, ApprovalState::Pending);
        assert!(record.approved_by.is_none());
        assert!(record.approved_at.is_none());
    }

    #[test]
    fn decide_captures_actor_and_time() {
        let at = chrono::Utc::now();
        let record = ApprovalRecord::decide(
            ApprovalState::Approved,
            7,
            Role::ProjectManager,
            at,
            Some("looks right".into()),
        );
        assert_eq!(record.status, ApprovalState::Approved);
        assert_eq!(record.approved_by, Some(7));
        assert_eq!(record.approved_by_role, Some(Role::ProjectManager));
        assert_eq!(record.approved_at, Some(at));
        assert_eq!(record.notes.as_deref(), Some("looks right"));
    }

    #[test]
    fn reset_discards_everything() {
        let mut record = ApprovalRecord::decide(
            ApprovalState::Rejected,
            7,
            Role::FinanceUser,
            chrono::Utc::now(),
            None,
        );
        record.reset();
        assert_eq!(record, ApprovalRecord::pending());
    }
}
