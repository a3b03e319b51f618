use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::{PermissionId, PermissionLabel, RoleId, RoleName};

use crate::{
    AccessAdminRepository, AuthorizationRepository, CreatePermissionInput, NewUser,
    PasswordHasher, PermissionDefinition, ProfileChanges, RoleDefinition, SaveRoleInput,
    UserRecord, UserRepository, UserRoleAssignment,
};

/// Single in-process store backing every identity and access port in tests.
#[derive(Default)]
pub(crate) struct FakeIdentityStore {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    next_id: i64,
    users: BTreeMap<UserId, UserRecord>,
    roles: BTreeMap<RoleId, RoleDefinition>,
    permissions: BTreeMap<PermissionId, PermissionDefinition>,
    grants: BTreeSet<(RoleId, PermissionId)>,
    assignments: BTreeSet<(UserId, RoleId)>,
}

impl FakeState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FakeIdentityStore {
    pub(crate) async fn seed_role(&self, name: &str, labels: &[&str]) -> AppResult<RoleId> {
        let role = self
            .create_role(SaveRoleInput {
                name: RoleName::new(name)?,
                description: None,
            })
            .await?;

        for label in labels {
            let label = PermissionLabel::new(label)?;
            let permission = match self.find_permission_by_label(&label).await? {
                Some(permission) => permission,
                None => {
                    self.create_permission(CreatePermissionInput {
                        action: format!("{label} action"),
                        label,
                    })
                    .await?
                }
            };
            self.grant_permission_to_role(role.role_id, permission.permission_id)
                .await?;
        }

        Ok(role.role_id)
    }
}

#[async_trait]
impl UserRepository for FakeIdentityStore {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .values()
            .find(|user| user.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut state = self.state.lock().await;
        let id = UserId::new(state.next_id());
        let record = UserRecord {
            id,
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            firstname: user.firstname,
            lastname: user.lastname,
            created_at: Utc::now(),
        };
        state.users.insert(id, record.clone());
        Ok(record)
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> AppResult<UserRecord> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
        user.username = changes.username;
        user.firstname = changes.firstname;
        user.lastname = changes.lastname;
        Ok(user.clone())
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.users.remove(&user_id).is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }
        state.assignments.retain(|(user, _)| *user != user_id);
        Ok(())
    }
}

#[async_trait]
impl AuthorizationRepository for FakeIdentityStore {
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.state.lock().await.users.contains_key(&user_id))
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleDefinition>> {
        let state = self.state.lock().await;
        Ok(state
            .assignments
            .iter()
            .filter(|(user, _)| *user == user_id)
            .filter_map(|(_, role_id)| state.roles.get(role_id).cloned())
            .collect())
    }

    async fn list_permissions_for_role(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<PermissionDefinition>> {
        self.list_role_permissions(role_id).await
    }
}

#[async_trait]
impl AccessAdminRepository for FakeIdentityStore {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        Ok(self.state.lock().await.roles.values().cloned().collect())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        Ok(self.state.lock().await.roles.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &RoleName) -> AppResult<Option<RoleDefinition>> {
        Ok(self
            .state
            .lock()
            .await
            .roles
            .values()
            .find(|role| &role.name == name)
            .cloned())
    }

    async fn create_role(&self, input: SaveRoleInput) -> AppResult<RoleDefinition> {
        let mut state = self.state.lock().await;
        if state.roles.values().any(|role| role.name == input.name) {
            return Err(AppError::Conflict(format!("role '{}' already exists", input.name)));
        }
        let role = RoleDefinition {
            role_id: RoleId::new(state.next_id()),
            name: input.name,
            description: input.description,
        };
        state.roles.insert(role.role_id, role.clone());
        Ok(role)
    }

    async fn update_role(
        &self,
        role_id: RoleId,
        input: SaveRoleInput,
    ) -> AppResult<RoleDefinition> {
        let mut state = self.state.lock().await;
        let role = state
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
        role.name = input.name;
        role.description = input.description;
        Ok(role.clone())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.roles.remove(&role_id).is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }
        state.grants.retain(|(role, _)| *role != role_id);
        state.assignments.retain(|(_, role)| *role != role_id);
        Ok(())
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        Ok(self.state.lock().await.permissions.values().cloned().collect())
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionDefinition>> {
        Ok(self
            .state
            .lock()
            .await
            .permissions
            .get(&permission_id)
            .cloned())
    }

    async fn find_permission_by_label(
        &self,
        label: &PermissionLabel,
    ) -> AppResult<Option<PermissionDefinition>> {
        Ok(self
            .state
            .lock()
            .await
            .permissions
            .values()
            .find(|permission| &permission.label == label)
            .cloned())
    }

    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        let mut state = self.state.lock().await;
        if state
            .permissions
            .values()
            .any(|permission| permission.label == input.label)
        {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                input.label
            )));
        }
        let permission = PermissionDefinition {
            permission_id: PermissionId::new(state.next_id()),
            label: input.label,
            action: input.action,
        };
        state
            .permissions
            .insert(permission.permission_id, permission.clone());
        Ok(permission)
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.permissions.remove(&permission_id).is_none() {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            )));
        }
        state
            .grants
            .retain(|(_, permission)| *permission != permission_id);
        Ok(())
    }

    async fn list_role_permissions(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<PermissionDefinition>> {
        let state = self.state.lock().await;
        Ok(state
            .grants
            .iter()
            .filter(|(role, _)| *role == role_id)
            .filter_map(|(_, permission_id)| state.permissions.get(permission_id).cloned())
            .collect())
    }

    async fn grant_permission_to_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        if !self
            .state
            .lock()
            .await
            .grants
            .insert((role_id, permission_id))
        {
            return Err(AppError::Conflict("permission already granted".to_owned()));
        }
        Ok(())
    }

    async fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        if !self
            .state
            .lock()
            .await
            .grants
            .remove(&(role_id, permission_id))
        {
            return Err(AppError::NotFound("permission is not granted".to_owned()));
        }
        Ok(())
    }

    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        if !self
            .state
            .lock()
            .await
            .assignments
            .insert((user_id, role_id))
        {
            return Err(AppError::Conflict("role already assigned".to_owned()));
        }
        Ok(())
    }

    async fn remove_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        if !self
            .state
            .lock()
            .await
            .assignments
            .remove(&(user_id, role_id))
        {
            return Err(AppError::NotFound("role is not assigned".to_owned()));
        }
        Ok(())
    }

    async fn list_user_role_assignments(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<UserRoleAssignment>> {
        let roles = self.list_roles_for_user(user_id).await?;
        let assigned_at = Utc::now().to_rfc3339();
        Ok(roles
            .into_iter()
            .map(|role| UserRoleAssignment {
                user_id,
                role,
                assigned_at: assigned_at.clone(),
            })
            .collect())
    }
}

/// Reversible stand-in for the Argon2 hasher.
pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}
