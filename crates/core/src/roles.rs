//! The closed four-value role type and the fixed management chain.
//!
//! External callers spell roles loosely ("PM", "Project Manager",
//! "finance_user", arbitrary casing). Everything is normalized into [`Role`]
//! the instant it enters the core; no other module ever handles a role
//! string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A user's role in the management hierarchy, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    FinanceUser,
    ProjectManager,
    Vendor,
}

/// All roles, ordered from the top of the chain down.
pub const ALL_ROLES: &[Role] = &[
    Role::Admin,
    Role::FinanceUser,
    Role::ProjectManager,
    Role::Vendor,
];

impl Role {
    /// Canonical wire/storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::FinanceUser => "finance_user",
            Role::ProjectManager => "project_manager",
            Role::Vendor => "vendor",
        }
    }

    /// The role a direct superior must have, per the fixed chain
    /// Admin → FinanceUser → ProjectManager → Vendor.
    ///
    /// Admins sit at the top and must not have a manager.
    pub fn required_manager_role(self) -> Option<Role> {
        match self {
            Role::Admin => None,
            Role::FinanceUser => Some(Role::Admin),
            Role::ProjectManager => Some(Role::FinanceUser),
            Role::Vendor => Some(Role::ProjectManager),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Parse a role from any of its known external spellings.
    ///
    /// Accepts canonical names, spaced/hyphenated variants, and the "PM"
    /// abbreviation, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "admin" | "administrator" => Ok(Role::Admin),
            "financeuser" | "finance" => Ok(Role::FinanceUser),
            "projectmanager" | "pm" => Ok(Role::ProjectManager),
            "vendor" => Ok(Role::Vendor),
            _ => Err(CoreError::Validation(format!(
                "Unknown role '{s}'. Must be one of: admin, finance_user, project_manager, vendor"
            ))),
        }
    }
}

/// Validate that `manager_role` may manage `child_role`.
///
/// Enforces the exact parent-role table: FinanceUser ⇐ Admin,
/// ProjectManager ⇐ FinanceUser, Vendor ⇐ ProjectManager. Any other pairing
/// is rejected with a reason naming the allowed manager role.
pub fn validate_assignment(child_role: Role, manager_role: Role) -> Result<(), CoreError> {
    match child_role.required_manager_role() {
        None => Err(CoreError::InvalidAssignment(format!(
            "{child_role} users sit at the top of the hierarchy and cannot be assigned a manager"
        ))),
        Some(required) if required == manager_role => Ok(()),
        Some(required) => Err(CoreError::InvalidAssignment(format!(
            "{child_role} users must be managed by a {required}, not a {manager_role}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_round_trip() {
        for role in ALL_ROLES {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn loose_spellings_normalize() {
        assert_eq!("PM".parse::<Role>().unwrap(), Role::ProjectManager);
        assert_eq!("Project Manager".parse::<Role>().unwrap(), Role::ProjectManager);
        assert_eq!("project-manager".parse::<Role>().unwrap(), Role::ProjectManager);
        assert_eq!("Finance User".parse::<Role>().unwrap(), Role::FinanceUser);
        assert_eq!("FINANCE_USER".parse::<Role>().unwrap(), Role::FinanceUser);
        assert_eq!("finance".parse::<Role>().unwrap(), Role::FinanceUser);
        assert_eq!("Administrator".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" vendor ".parse::<Role>().unwrap(), Role::Vendor);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "supervisor".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("Unknown role"));
    }

    #[test]
    fn manager_chain_is_one_level() {
        assert_eq!(Role::Admin.required_manager_role(), None);
        assert_eq!(Role::FinanceUser.required_manager_role(), Some(Role::Admin));
        assert_eq!(
            Role::ProjectManager.required_manager_role(),
            Some(Role::FinanceUser)
        );
        assert_eq!(Role::Vendor.required_manager_role(), Some(Role::ProjectManager));
    }

    #[test]
    fn valid_pairings_pass() {
        assert!(validate_assignment(Role::FinanceUser, Role::Admin).is_ok());
        assert!(validate_assignment(Role::ProjectManager, Role::FinanceUser).is_ok());
        assert!(validate_assignment(Role::Vendor, Role::ProjectManager).is_ok());
    }

    #[test]
    fn skipping_a_level_is_rejected() {
        let err = validate_assignment(Role::Vendor, Role::Admin).unwrap_err();
        assert!(err.to_string().contains("project_manager"));
    }

    #[test]
    fn admin_cannot_have_a_manager() {
        let err = validate_assignment(Role::Admin, Role::Admin).unwrap_err();
        assert!(err.to_string().contains("top of the hierarchy"));
    }

    #[test]
    fn every_other_pairing_is_rejected() {
        for &child in ALL_ROLES {
            for &manager in ALL_ROLES {
                let expected_ok = child.required_manager_role() == Some(manager);
                assert_eq!(
                    validate_assignment(child, manager).is_ok(),
                    expected_ok,
                    "pairing {child} <= {manager}"
                );
            }
        }
    }
}
