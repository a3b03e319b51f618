use super::*;

impl PostgresAccessAdminRepository {
    pub(super) async fn assign_role_to_user_impl(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_write_error(
                error,
                "assign role",
                format!("role '{role_id}' is already assigned to user '{user_id}'").as_str(),
            )
        })?;

        Ok(())
    }

    pub(super) async fn remove_role_from_user_impl(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id.as_i64())
            .bind(role_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to remove role: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' is not assigned to user '{user_id}'"
            )));
        }

        Ok(())
    }

    pub(super) async fn list_user_role_assignments_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<UserRoleAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT
                user_roles.user_id,
                roles.id AS role_id,
                roles.name,
                roles.description,
                user_roles.assigned_at
            FROM user_roles
            INNER JOIN roles ON roles.id = user_roles.role_id
            WHERE user_roles.user_id = $1
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role assignments: {error}"))
        })?;

        rows.into_iter().map(AssignmentRow::into_assignment).collect()
    }
}
