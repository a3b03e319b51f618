use super::*;

impl PostgresAccessAdminRepository {
    pub(super) async fn list_permissions_impl(&self) -> AppResult<Vec<PermissionDefinition>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            "SELECT id, label, action FROM permissions ORDER BY label",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(PermissionRow::into_definition).collect()
    }

    pub(super) async fn find_permission_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionDefinition>> {
        sqlx::query_as::<_, PermissionRow>(
            "SELECT id, label, action FROM permissions WHERE id = $1",
        )
        .bind(permission_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?
        .map(PermissionRow::into_definition)
        .transpose()
    }

    pub(super) async fn find_permission_by_label_impl(
        &self,
        label: &PermissionLabel,
    ) -> AppResult<Option<PermissionDefinition>> {
        sqlx::query_as::<_, PermissionRow>(
            "SELECT id, label, action FROM permissions WHERE label = $1",
        )
        .bind(label.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find permission by label: {error}"))
        })?
        .map(PermissionRow::into_definition)
        .transpose()
    }

    pub(super) async fn create_permission_impl(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        let conflict = format!("permission '{}' already exists", input.label);
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (label, action)
            VALUES ($1, $2)
            RETURNING id, label, action
            "#,
        )
        .bind(input.label.as_str())
        .bind(input.action)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "create permission", conflict.as_str()))?;

        row.into_definition()
    }

    pub(super) async fn delete_permission_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(permission_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to delete permission: {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            )));
        }

        Ok(())
    }

    pub(super) async fn list_role_permissions_impl(
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
            AppError::Internal(format!("failed to list role permissions: {error}"))
        })?;

        rows.into_iter().map(PermissionRow::into_definition).collect()
    }

    pub(super) async fn grant_permission_to_role_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(role_id.as_i64())
        .bind(permission_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_write_error(
                error,
                "grant permission",
                format!("permission '{permission_id}' is already granted to role '{role_id}'")
                    .as_str(),
            )
        })?;

        Ok(())
    }

    pub(super) async fn revoke_permission_from_role_impl(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2",
        )
        .bind(role_id.as_i64())
        .bind(permission_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke permission: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' is not granted to role '{role_id}'"
            )));
        }

        Ok(())
    }
}
