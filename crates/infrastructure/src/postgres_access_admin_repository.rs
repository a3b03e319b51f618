use async_trait::async_trait;
use sqlx::PgPool;

use blablabook_application::{
    AccessAdminRepository, CreatePermissionInput, PermissionDefinition, RoleDefinition,
    SaveRoleInput, UserRoleAssignment,
};
use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::{PermissionId, PermissionLabel, RoleId, RoleName};

use crate::access_rows::{AssignmentRow, PermissionRow, RoleRow};

mod assignments;
mod permissions;
mod roles;


/// PostgreSQL-backed repository for role, permission and assignment administration.
#[derive(Clone)]
pub struct PostgresAccessAdminRepository {
    pool: PgPool,
}

impl PostgresAccessAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessAdminRepository for PostgresAccessAdminRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        self.list_roles_impl().await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        self.find_role_impl(role_id).await
    }

    async fn find_role_by_name(&self, name: &RoleName) -> AppResult<Option<RoleDefinition>> {
        self.find_role_by_name_impl(name).await
    }

    async fn create_role(&self, input: SaveRoleInput) -> AppResult<RoleDefinition> {
        self.create_role_impl(input).await
    }

    async fn update_role(
        &self,
        role_id: RoleId,
        input: SaveRoleInput,
    ) -> AppResult<RoleDefinition> {
        self.update_role_impl(role_id, input).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(role_id).await
    }

    async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        self.list_permissions_impl().await
    }

    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionDefinition>> {
        self.find_permission_impl(permission_id).await
    }

    async fn find_permission_by_label(
        &self,
        label: &PermissionLabel,
    ) -> AppResult<Option<PermissionDefinition>> {
        self.find_permission_by_label_impl(label).await
    }

    async fn create_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        self.create_permission_impl(input).await
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.delete_permission_impl(permission_id).await
    }

    async fn list_role_permissions(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<PermissionDefinition>> {
        self.list_role_permissions_impl(role_id).await
    }

    async fn grant_permission_to_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.grant_permission_to_role_impl(role_id, permission_id)
            .await
    }

    async fn revoke_permission_from_role(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.revoke_permission_from_role_impl(role_id, permission_id)
            .await
    }

    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.assign_role_to_user_impl(user_id, role_id).await
    }

    async fn remove_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.remove_role_from_user_impl(user_id, role_id).await
    }

    async fn list_user_role_assignments(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<UserRoleAssignment>> {
        self.list_user_role_assignments_impl(user_id).await
    }
}

fn map_write_error(error: sqlx::Error, operation: &str, conflict: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        match database_error.code().as_deref() {
            Some("23505") => return AppError::Conflict(conflict.to_owned()),
            Some("23503") => {
                return AppError::NotFound(format!(
                    "failed to {operation}: referenced row does not exist"
                ));
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
