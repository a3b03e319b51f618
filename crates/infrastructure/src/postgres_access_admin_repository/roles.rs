use super::*;

impl PostgresAccessAdminRepository {
    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, description
            FROM roles
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        rows.into_iter().map(RoleRow::into_definition).collect()
    }

    pub(super) async fn find_role_impl(
        &self,
        role_id: RoleId,
    ) -> AppResult<Option<RoleDefinition>> {
        sqlx::query_as::<_, RoleRow>("SELECT id, name, description FROM roles WHERE id = $1")
            .bind(role_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?
            .map(RoleRow::into_definition)
            .transpose()
    }

    pub(super) async fn find_role_by_name_impl(
        &self,
        name: &RoleName,
    ) -> AppResult<Option<RoleDefinition>> {
        sqlx::query_as::<_, RoleRow>("SELECT id, name, description FROM roles WHERE name = $1")
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to find role by name: {error}")))?
            .map(RoleRow::into_definition)
            .transpose()
    }

    pub(super) async fn create_role_impl(&self, input: SaveRoleInput) -> AppResult<RoleDefinition> {
        let conflict = format!("role '{}' already exists", input.name);
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#,
        )
        .bind(input.name.as_str())
        .bind(input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "create role", conflict.as_str()))?;

        row.into_definition()
    }

    pub(super) async fn update_role_impl(
        &self,
        role_id: RoleId,
        input: SaveRoleInput,
    ) -> AppResult<RoleDefinition> {
        let conflict = format!("role '{}' already exists", input.name);
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            UPDATE roles
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description
            "#,
        )
        .bind(role_id.as_i64())
        .bind(input.name.as_str())
        .bind(input.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_write_error(error, "update role", conflict.as_str()))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        row.into_definition()
    }

    pub(super) async fn delete_role_impl(&self, role_id: RoleId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        Ok(())
    }
}
