//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use blablabook_application::{NewUser, ProfileChanges, UserRecord, UserRepository};
use blablabook_core::{AppError, AppResult, UserId};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    password_hash: String,
    firstname: Option<String>,
    lastname: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            firstname: row.firstname,
            lastname: row.lastname,
            created_at: row.created_at,
        }
    }
}

mod account;
mod lookup;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_username_impl(username).await
    }

    async fn create(&self, user: NewUser) -> AppResult<UserRecord> {
        self.create_impl(user).await
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> AppResult<UserRecord> {
        self.update_profile_impl(user_id, changes).await
    }

    async fn delete(&self, user_id: UserId) -> AppResult<()> {
        self.delete_impl(user_id).await
    }
}

fn unique_conflict_or_internal(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        let constraint = database_error.constraint().unwrap_or_default();
        if constraint.contains("username") {
            return AppError::Conflict("this username is already taken".to_owned());
        }
        return AppError::Conflict("an account with this email already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
