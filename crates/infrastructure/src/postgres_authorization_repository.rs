use async_trait::async_trait;
use sqlx::PgPool;

use blablabook_application::{AuthorizationRepository, PermissionDefinition, RoleDefinition};
use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::RoleId;

use crate::access_rows::{PermissionRow, RoleRow};

/// PostgreSQL-backed repository for the user → role → permission traversal.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to look up user: {error}")))
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT roles.id, roles.name, roles.description
            FROM user_roles
            INNER JOIN roles ON roles.id = user_roles.role_id
            WHERE user_roles.user_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load user roles: {error}")))?;

        rows.into_iter().map(RoleRow::into_definition).collect()
    }

    async fn list_permissions_for_role(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<PermissionDefinition>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT permissions.id, permissions.label, permissions.action
            FROM role_permissions
            INNER JOIN permissions ON permissions.id = role_permissions.permission_id
            WHERE role_permissions.role_id = $1
            ORDER BY permissions.label
            "#,
        )
        .bind(role_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load role permissions: {error}"))
        })?;

        rows.into_iter().map(PermissionRow::into_definition).collect()
    }
}
