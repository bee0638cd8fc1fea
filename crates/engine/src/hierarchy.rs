//! Hierarchy administration: manager assignment and bulk report
//! reconciliation.
//!
//! Both operations re-validate the parent-role table before touching
//! anything and hand the store a single [`HierarchyUpdate`] batch, so a
//! child never ends up pointing at a manager that no longer claims them,
//! nor the reverse.

use std::collections::HashMap;
use std::sync::Arc;

use apflow_core::error::CoreError;
use apflow_core::roles::validate_assignment;
use apflow_core::types::DbId;
use apflow_store::models::user::User;
use apflow_store::traits::{HierarchyUpdate, UserStore};

/// Administrative surface over the hierarchy store.
#[derive(Clone)]
pub struct HierarchyAdmin {
    users: Arc<dyn UserStore>,
}

/// Working copy of managers' report lists during one reconciliation, so
/// edits touching the same manager twice compose instead of clobbering
/// each other.
struct ReportLists {
    lists: HashMap<DbId, Vec<DbId>>,
}

impl ReportLists {
    fn new() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }

    fn seed(&mut self, manager: &User) {
        self.lists
            .entry(manager.id)
            .or_insert_with(|| manager.direct_reports.clone());
    }

    fn add(&mut self, manager_id: DbId, report_id: DbId) {
        let list = self.lists.entry(manager_id).or_default();
        if !list.contains(&report_id) {
            list.push(report_id);
        }
    }

    fn remove(&mut self, manager_id: DbId, report_id: DbId) {
        if let Some(list) = self.lists.get_mut(&manager_id) {
            list.retain(|id| *id != report_id);
        }
    }

    fn replace(&mut self, manager_id: DbId, reports: Vec<DbId>) {
        self.lists.insert(manager_id, reports);
    }

    fn into_entries(self) -> Vec<(DbId, Vec<DbId>)> {
        let mut entries: Vec<_> = self.lists.into_iter().collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

impl HierarchyAdmin {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    async fn load(&self, id: DbId) -> Result<User, CoreError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "User", id })
    }

    /// Assign (or clear, with `None`) a user's direct superior.
    ///
    /// Validates the parent-role table, then updates the child's
    /// `managed_by` plus both affected managers' report lists in one
    /// atomic batch.
    pub async fn assign_manager(
        &self,
        user_id: DbId,
        manager_id: Option<DbId>,
    ) -> Result<(), CoreError> {
        let child = self.load(user_id).await?;

        let mut managed_by = Vec::new();
        let mut reports = ReportLists::new();

        if let Some(manager_id) = manager_id {
            let manager = self.load(manager_id).await?;
            validate_assignment(child.role, manager.role)?;
            if !manager.is_active {
                return Err(CoreError::InvalidAssignment(format!(
                    "manager {} is deactivated",
                    manager.display_name
                )));
            }

            reports.seed(&manager);
            reports.add(manager.id, child.id);
            managed_by.push((child.id, Some(manager.id)));
        } else {
            managed_by.push((child.id, None));
        }

        // Drop the child from the previous manager's report list.
        if let Some(old_manager_id) = child.managed_by {
            if Some(old_manager_id) != manager_id {
                let old_manager = self.load(old_manager_id).await?;
                reports.seed(&old_manager);
                reports.remove(old_manager_id, child.id);
            }
        }

        self.users
            .apply_hierarchy_update(HierarchyUpdate {
                set_managed_by: managed_by,
                set_direct_reports: reports.into_entries(),
            })
            .await?;

        tracing::info!(
            user_id,
            manager_id = ?manager_id,
            "Hierarchy assignment updated"
        );
        Ok(())
    }

    /// Replace a manager's full set of direct reports.
    ///
    /// Reconciles both directions as one logical operation: dropped
    /// reports lose their `managed_by`, newly listed reports gain it (and
    /// are removed from any previous manager's list), and the manager's
    /// own list is rewritten.
    pub async fn replace_direct_reports(
        &self,
        manager_id: DbId,
        new_report_ids: Vec<DbId>,
    ) -> Result<(), CoreError> {
        let manager = self.load(manager_id).await?;

        let mut new_reports: Vec<DbId> = Vec::new();
        for id in new_report_ids {
            if !new_reports.contains(&id) {
                new_reports.push(id);
            }
        }

        let mut managed_by = Vec::new();
        let mut reports = ReportLists::new();
        reports.seed(&manager);

        for &report_id in &new_reports {
            let report = self.load(report_id).await?;
            validate_assignment(report.role, manager.role)?;

            if report.managed_by != Some(manager_id) {
                managed_by.push((report_id, Some(manager_id)));

                // Detach from whichever manager previously claimed them.
                if let Some(previous_id) = report.managed_by {
                    let previous = self.load(previous_id).await?;
                    reports.seed(&previous);
                    reports.remove(previous_id, report_id);
                }
            }
        }

        for &dropped_id in &manager.direct_reports {
            if new_reports.contains(&dropped_id) {
                continue;
            }
            let dropped = self.load(dropped_id).await?;
            if dropped.managed_by == Some(manager_id) {
                managed_by.push((dropped_id, None));
            }
        }

        reports.replace(manager_id, new_reports.clone());

        self.users
            .apply_hierarchy_update(HierarchyUpdate {
                set_managed_by: managed_by,
                set_direct_reports: reports.into_entries(),
            })
            .await?;

        tracing::info!(
            manager_id,
            report_count = new_reports.len(),
            "Direct reports replaced"
        );
        Ok(())
    }
}
