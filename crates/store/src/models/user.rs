//! User entity model and DTOs.

use serde::{Deserialize, Serialize};

use apflow_core::roles::Role;
use apflow_core::types::{DbId, Timestamp};

/// A user in the management hierarchy.
///
/// `managed_by` is the single source for the upward link; `direct_reports`
/// is the manager-side reverse index. Hierarchy administration keeps the
/// two in sync, but imported data may arrive with only one side populated --
/// the resolver's reverse-index strategy exists for exactly that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    pub managed_by: Option<DbId>,
    pub direct_reports: Vec<DbId>,
    /// Project identifiers this user oversees. Meaningful only for
    /// ProjectManager users.
    pub assigned_projects: Vec<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Whether this user may be the target of automatic resolution.
    pub fn resolvable(&self) -> bool {
        self.is_active
    }
}

/// DTO for provisioning a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub display_name: String,
    pub email: String,
    pub role: Role,
    pub managed_by: Option<DbId>,
    pub assigned_projects: Vec<String>,
}
