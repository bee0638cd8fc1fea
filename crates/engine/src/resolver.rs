//! The hierarchy resolver: derive the governing Finance User for a
//! Project Manager from the management tree.
//!
//! Resolution is an explicit, ordered cascade. The winning strategy is part
//! of the result so operators and tests can see *how* an invoice was
//! routed, never just that it was. No strategy ever guesses: an invoice
//! with no derivable Finance User stays unrouted and flagged.

use std::sync::Arc;

use serde::Serialize;

use apflow_core::error::CoreError;
use apflow_core::roles::Role;
use apflow_core::types::DbId;
use apflow_store::models::invoice::Invoice;
use apflow_store::models::user::User;
use apflow_store::traits::UserStore;

/// Which strategy produced the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// The PM's `managed_by` points directly at a Finance User.
    DirectChain,
    /// Some Finance User lists the PM among their direct reports.
    ReverseIndex,
    /// Walked up from the invoice's submitting vendor:
    /// vendor → PM → Finance User.
    SubmitterChain,
    Unresolved,
}

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub finance_user: Option<DbId>,
    pub strategy: ResolutionStrategy,
}

impl Resolution {
    fn unresolved() -> Self {
        Self {
            finance_user: None,
            strategy: ResolutionStrategy::Unresolved,
        }
    }

    fn found(finance_user: DbId, strategy: ResolutionStrategy) -> Self {
        Self {
            finance_user: Some(finance_user),
            strategy,
        }
    }
}

/// Resolves Finance Users from the management hierarchy.
#[derive(Clone)]
pub struct HierarchyResolver {
    users: Arc<dyn UserStore>,
}

impl HierarchyResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Resolve the governing Finance User for a PM.
    ///
    /// Strategies, first success wins: direct chain, then reverse index.
    /// Fails `NotFound` for an unknown PM id; an unknown or broken *link*
    /// yields `Unresolved`, not an error.
    pub async fn resolve_finance_user_for_pm(&self, pm_id: DbId) -> Result<Resolution, CoreError> {
        let pm = self
            .users
            .find_by_id(pm_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: pm_id,
            })?;

        Ok(self.resolve_from_pm(&pm).await?.unwrap_or_else(Resolution::unresolved))
    }

    /// Resolve for an invoice: the PM strategies against `assigned_pm`,
    /// then the submitter-chain fallback for invoices without a clean PM
    /// link.
    pub async fn resolve_for_invoice(&self, invoice: &Invoice) -> Result<Resolution, CoreError> {
        if let Some(pm_id) = invoice.assigned_pm {
            if let Some(pm) = self.users.find_by_id(pm_id).await? {
                if let Some(resolution) = self.resolve_from_pm(&pm).await? {
                    return Ok(resolution);
                }
            }
        }

        if let Some(resolution) = self.resolve_from_submitter(invoice.submitted_by).await? {
            return Ok(resolution);
        }

        Ok(Resolution::unresolved())
    }

    /// Strategies 1 and 2, in order. `None` means "keep falling back".
    async fn resolve_from_pm(&self, pm: &User) -> Result<Option<Resolution>, CoreError> {
        // Strategy 1: direct chain.
        if let Some(manager_id) = pm.managed_by {
            if let Some(manager) = self.users.find_by_id(manager_id).await? {
                if manager.role == Role::FinanceUser && manager.resolvable() {
                    return Ok(Some(Resolution::found(
                        manager.id,
                        ResolutionStrategy::DirectChain,
                    )));
                }
            }
        }

        // Strategy 2: reverse index over Finance Users' report lists.
        for finance_user in self.users.list_by_role(Role::FinanceUser).await? {
            if finance_user.resolvable() && finance_user.direct_reports.contains(&pm.id) {
                return Ok(Some(Resolution::found(
                    finance_user.id,
                    ResolutionStrategy::ReverseIndex,
                )));
            }
        }

        Ok(None)
    }

    /// Strategy 3: vendor → PM → Finance User via `managed_by` links.
    async fn resolve_from_submitter(
        &self,
        submitter_id: DbId,
    ) -> Result<Option<Resolution>, CoreError> {
        let Some(submitter) = self.users.find_by_id(submitter_id).await? else {
            return Ok(None);
        };
        if submitter.role != Role::Vendor {
            return Ok(None);
        }

        let Some(pm_id) = submitter.managed_by else {
            return Ok(None);
        };
        let Some(pm) = self.users.find_by_id(pm_id).await? else {
            return Ok(None);
        };
        if pm.role != Role::ProjectManager || !pm.resolvable() {
            return Ok(None);
        }

        let Some(finance_id) = pm.managed_by else {
            return Ok(None);
        };
        let Some(finance_user) = self.users.find_by_id(finance_id).await? else {
            return Ok(None);
        };
        if finance_user.role != Role::FinanceUser || !finance_user.resolvable() {
            return Ok(None);
        }

        Ok(Some(Resolution::found(
            finance_user.id,
            ResolutionStrategy::SubmitterChain,
        )))
    }
}
