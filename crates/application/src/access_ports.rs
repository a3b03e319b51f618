use async_trait::async_trait;

use blablabook_core::{AppResult, UserId};
use blablabook_domain::{PermissionId, PermissionLabel, RoleId, RoleName};

/// Role definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role identifier.
    pub role_id: RoleId,
    /// Unique lower-cased role name.
    pub name: RoleName,
    /// Optional description shown to administrators.
    pub description: Option<String>,
}

/// Permission definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDefinition {
    /// Stable permission identifier.
    pub permission_id: PermissionId,
    /// Unique permission label.
    pub label: PermissionLabel,
    /// Human-readable description of the granted action.
    pub action: String,
}

/// Assignment projection mapping a user to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoleAssignment {
    /// Assigned user.
    pub user_id: UserId,
    /// Assigned role.
    pub role: RoleDefinition,
    /// Assignment timestamp in RFC3339.
    pub assigned_at: String,
}

/// Input payload for creating or updating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRoleInput {
    /// Unique role name.
    pub name: RoleName,
    /// Optional description.
    pub description: Option<String>,
}

/// Input payload for creating a permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionInput {
    /// Unique permission label.
    pub label: PermissionLabel,
    /// Human-readable description of the granted action.
    pub action: String,
}

/// Repository port for role, permission and assignment administration.
///
/// Adapters report duplicate names, labels, grants and assignments as
/// `AppError::Conflict` and missing rows on mutation as `AppError::NotFound`.
#[async_trait]
pub trait AccessAdminRepository: Send + Sync {
    /// Lists every role ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Finds a role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>>;

    /// Finds a role by unique name.
    async fn find_role_by_name(&self, name: &RoleName) -> AppResult<Option<RoleDefinition>>;

    /// Creates a role.
    async fn create_role(&self, input: SaveRoleInput) -> AppResult<RoleDefinition>;

    /// Renames or re-describes a role.
    async fn update_role(&self, role_id: RoleId, input: SaveRoleInput)
    -> AppResult<RoleDefinition>;

    /// Deletes a role together with its grants and assignments.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Lists every permission ordered by label.
    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>>;

    /// Finds a permission by identifier.
    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionDefinition>>;

    /// Finds a permission by unique label.
    async fn find_permission_by_label(
        &self,
        label: &PermissionLabel,
    ) -> AppResult<Option<PermissionDefinition>>;

    /// Creates a permission.
    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition>;

    /// Deletes a permission together with its grants.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;

    /// Lists the permissions granted to a role.
    async fn list_role_permissions(&self, role_id: RoleId)
    -> AppResult<Vec<PermissionDefinition>>;

    /// Grants a permission to a role.
    async fn grant_permission_to_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()>;

    /// Revokes a permission from a role.
    async fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()>;

    /// Assigns a role to a user.
    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Removes a role assignment from a user.
    async fn remove_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Lists the role assignments of a user.
    async fn list_user_role_assignments(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<UserRoleAssignment>>;
}
