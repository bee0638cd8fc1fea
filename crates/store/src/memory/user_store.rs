//! In-memory user store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use apflow_core::error::CoreError;
use apflow_core::roles::Role;
use apflow_core::types::DbId;

use crate::models::user::{CreateUser, User};
use crate::traits::{HierarchyUpdate, UserStore};

/// Reference [`UserStore`] backed by a `HashMap` behind an async `RwLock`.
///
/// Hierarchy edits take the single write lock, which gives
/// `apply_hierarchy_update` its all-or-nothing semantics.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<DbId, User>>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, CoreError> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn list_all(&self) -> Result<Vec<User>, CoreError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn insert(&self, input: CreateUser) -> Result<User, CoreError> {
        let now = chrono::Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            display_name: input.display_name,
            email: input.email,
            role: input.role,
            managed_by: input.managed_by,
            direct_reports: Vec::new(),
            assigned_projects: input.assigned_projects,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let mut users = self.users.write().await;
        if let Some(manager_id) = user.managed_by {
            let manager = users
                .get_mut(&manager_id)
                .ok_or(CoreError::NotFound {
                    entity: "User",
                    id: manager_id,
                })?;
            if !manager.direct_reports.contains(&user.id) {
                manager.direct_reports.push(user.id);
            }
        }
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn deactivate(&self, id: DbId) -> Result<bool, CoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) if user.is_active => {
                user.is_active = false;
                user.updated_at = chrono::Utc::now();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(CoreError::NotFound { entity: "User", id }),
        }
    }

    async fn apply_hierarchy_update(&self, update: HierarchyUpdate) -> Result<(), CoreError> {
        let mut users = self.users.write().await;

        // Validate every referenced id before touching anything, so the
        // batch applies fully or not at all.
        for (user_id, manager_id) in &update.set_managed_by {
            if !users.contains_key(user_id) {
                return Err(CoreError::NotFound {
                    entity: "User",
                    id: *user_id,
                });
            }
            if let Some(manager_id) = manager_id {
                if !users.contains_key(manager_id) {
                    return Err(CoreError::NotFound {
                        entity: "User",
                        id: *manager_id,
                    });
                }
            }
        }
        for (manager_id, reports) in &update.set_direct_reports {
            if !users.contains_key(manager_id) {
                return Err(CoreError::NotFound {
                    entity: "User",
                    id: *manager_id,
                });
            }
            for report_id in reports {
                if !users.contains_key(report_id) {
                    return Err(CoreError::NotFound {
                        entity: "User",
                        id: *report_id,
                    });
                }
            }
        }

        let now = chrono::Utc::now();
        for (user_id, manager_id) in &update.set_managed_by {
            let user = users.get_mut(user_id).expect("validated above");
            user.managed_by = *manager_id;
            user.updated_at = now;
        }
        for (manager_id, reports) in &update.set_direct_reports {
            let manager = users.get_mut(manager_id).expect("validated above");
            manager.direct_reports = reports.clone();
            manager.updated_at = now;
        }
        Ok(())
    }
}
