use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, user: NewUser) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, username, password_hash, firstname, lastname)
            VALUES (LOWER($1), $2, $3, $4, $5)
            RETURNING id, email, username, password_hash, firstname, lastname, created_at
            "#,
        )
        .bind(user.email)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.firstname)
        .bind(user.lastname)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| unique_conflict_or_internal(error, "create user"))?;

        Ok(row.into())
    }

    pub(super) async fn update_profile_impl(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET username = $2, firstname = $3, lastname = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, email, username, password_hash, firstname, lastname, created_at
            "#,
        )
        .bind(user_id.as_i64())
        .bind(changes.username)
        .bind(changes.firstname)
        .bind(changes.lastname)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| unique_conflict_or_internal(error, "update profile"))?;

        row.map(UserRecord::from)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    pub(super) async fn delete_impl(&self, user_id: UserId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        Ok(())
    }
}
