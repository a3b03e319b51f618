use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use blablabook_application::{
    AccessAdminRepository, AuthorizationRepository, CreatePermissionInput, NewUser,
    PermissionDefinition, ProfileChanges, RoleDefinition, SaveRoleInput, UserRecord,
    UserRepository, UserRoleAssignment,
};
use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::{PermissionId, PermissionLabel, RoleId, RoleName};

mod access;
mod users;

#[cfg(test)]
mod tests;

/// In-memory store implementing the user, authorization and access
/// administration ports over one shared state.
///
/// [`InMemoryIdentityStore::set_unavailable`] makes every call fail, which
/// stands in for a lost database connection.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    state: RwLock<IdentityState>,
    unavailable: AtomicBool,
}

#[derive(Debug, Default)]
struct IdentityState {
    next_user_id: i64,
    next_role_id: i64,
    next_permission_id: i64,
    users: BTreeMap<UserId, UserRecord>,
    roles: BTreeMap<RoleId, RoleDefinition>,
    permissions: BTreeMap<PermissionId, PermissionDefinition>,
    grants: BTreeSet<(RoleId, PermissionId)>,
    assignments: BTreeMap<(UserId, RoleId), DateTime<Utc>>,
}

impl InMemoryIdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles simulated storage failure.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "in-memory identity store is unavailable".to_owned(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryIdentityStore {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.check_available()?;
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.check_available()?;
        self.find_user_by(|user| user.email.eq_ignore_ascii_case(email))
            .await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        self.check_available()?;
        self.find_user_by(|user| user.username.eq_ignore_ascii_case(username))
            .await
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        self.check_available()?;
        self.create_user(user).await
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> AppResult<UserRecord> {
        self.check_available()?;
        self.update_user_profile(user_id, changes).await
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        self.check_available()?;
        self.delete_user(user_id).await
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryIdentityStore {
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        self.check_available()?;
        Ok(self.state.read().await.users.contains_key(&user_id))
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleDefinition>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .assignments
            .keys()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, role_id)| state.roles.get(role_id).cloned())
            .collect())
    }

    async fn list_permissions_for_role(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<PermissionDefinition>> {
        self.check_available()?;
        Ok(self.state.read().await.role_permissions(role_id))
    }
}

#[async_trait]
impl AccessAdminRepository for InMemoryIdentityStore {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        self.check_available()?;
        let mut roles: Vec<RoleDefinition> =
            self.state.read().await.roles.values().cloned().collect();
        roles.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roles)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        self.check_available()?;
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &RoleName) -> AppResult<Option<RoleDefinition>> {
        self.check_available()?;
        Ok(self.state.read().await.role_named(name).cloned())
    }

    async fn create_role(&self, input: SaveRoleInput) -> AppResult<RoleDefinition> {
        self.check_available()?;
        self.insert_role(input).await
    }

    async fn update_role(
        &self,
        role_id: RoleId,
        input: SaveRoleInput,
    ) -> AppResult<RoleDefinition> {
        self.check_available()?;
        self.replace_role(role_id, input).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.check_available()?;
        self.remove_role(role_id).await
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        self.check_available()?;
        let mut permissions: Vec<PermissionDefinition> =
            self.state.read().await.permissions.values().cloned().collect();
        permissions.sort_by(|left, right| left.label.cmp(&right.label));
        Ok(permissions)
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionDefinition>> {
        self.check_available()?;
        Ok(self
            .state
            .read()
            .await
            .permissions
            .get(&permission_id)
            .cloned())
    }

    async fn find_permission_by_label(
        &self,
        label: &PermissionLabel,
    ) -> AppResult<Option<PermissionDefinition>> {
        self.check_available()?;
        Ok(self.state.read().await.permission_labelled(label).cloned())
    }

    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        self.check_available()?;
        self.insert_permission(input).await
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.check_available()?;
        self.remove_permission(permission_id).await
    }

    async fn list_role_permissions(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<PermissionDefinition>> {
        self.check_available()?;
        Ok(self.state.read().await.role_permissions(role_id))
    }

    async fn grant_permission_to_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.check_available()?;
        self.insert_grant(role_id, permission_id).await
    }

    async fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.check_available()?;
        self.remove_grant(role_id, permission_id).await
    }

    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.check_available()?;
        self.insert_assignment(user_id, role_id).await
    }

    async fn remove_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.check_available()?;
        self.remove_assignment(user_id, role_id).await
    }

    async fn list_user_role_assignments(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<UserRoleAssignment>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .assignments
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .filter_map(|((_, role_id), assigned_at)| {
                state.roles.get(role_id).map(|role| UserRoleAssignment {
                    user_id,
                    role: role.clone(),
                    assigned_at: assigned_at.to_rfc3339(),
                })
            })
            .collect())
    }
}

impl IdentityState {
    fn role_named(&self, name: &RoleName) -> Option<&RoleDefinition> {
        self.roles.values().find(|role| &role.name == name)
    }

    fn permission_labelled(&self, label: &PermissionLabel) -> Option<&PermissionDefinition> {
        self.permissions
            .values()
            .find(|permission| &permission.label == label)
    }

    fn role_permissions(&self, role_id: RoleId) -> Vec<PermissionDefinition> {
        self.grants
            .iter()
            .filter(|(role, _)| *role == role_id)
            .filter_map(|(_, permission_id)| self.permissions.get(permission_id).cloned())
            .collect()
    }
}
