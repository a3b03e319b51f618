use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use blablabook_application::{
    AUDIT_MAX_LIMIT, AuthorizationAuditEntry, AuthorizationAuditQuery, AuthorizationAuditRecord,
    AuthorizationAuditRepository,
};
use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::{AuthorizationOutcome, PermissionLabel};

/// PostgreSQL-backed repository for authorization decisions.
#[derive(Clone)]
pub struct PostgresAuthorizationAuditRepository {
    pool: PgPool,
}

impl PostgresAuthorizationAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditRow {
    id: i64,
    user_id: Option<i64>,
    user_email: Option<String>,
    permission: String,
    resource: Option<String>,
    resource_id: Option<String>,
    outcome: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl AuditRow {
    fn into_entry(self) -> AppResult<AuthorizationAuditEntry> {
        let permission = PermissionLabel::new(self.permission.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode audited permission '{}' for entry '{}': {error}",
                self.permission, self.id
            ))
        })?;
        let outcome = AuthorizationOutcome::from_str(self.outcome.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode audited outcome '{}' for entry '{}': {error}",
                self.outcome, self.id
            ))
        })?;

        Ok(AuthorizationAuditEntry {
            entry_id: self.id,
            record: AuthorizationAuditRecord {
                user_id: self.user_id.map(UserId::new),
                user_email: self.user_email,
                permission,
                resource: self.resource,
                resource_id: self.resource_id,
                outcome,
                ip_address: self.ip_address,
                user_agent: self.user_agent,
                occurred_at: self.occurred_at,
            },
        })
    }
}

#[async_trait]
impl AuthorizationAuditRepository for PostgresAuthorizationAuditRepository {
    async fn append_record(&self, record: AuthorizationAuditRecord) -> AppResult<()> {
        let granted = record.granted();
        sqlx::query(
            r#"
            INSERT INTO authorization_audit_log (
                user_id,
                user_email,
                permission,
                resource,
                resource_id,
                outcome,
                granted,
                ip_address,
                user_agent,
                occurred_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.user_id.map(|user_id| user_id.as_i64()))
        .bind(record.user_email)
        .bind(record.permission.as_str())
        .bind(record.resource)
        .bind(record.resource_id)
        .bind(record.outcome.as_str())
        .bind(granted)
        .bind(record.ip_address)
        .bind(record.user_agent)
        .bind(record.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to append authorization audit record: {error}"))
        })?;

        Ok(())
    }

    async fn list_recent_records(
        &self,
        query: AuthorizationAuditQuery,
    ) -> AppResult<Vec<AuthorizationAuditEntry>> {
        let capped_limit = query.limit.clamp(1, AUDIT_MAX_LIMIT) as i64;
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT
                id,
                user_id,
                user_email,
                permission,
                resource,
                resource_id,
                outcome,
                ip_address,
                user_agent,
                occurred_at
            FROM authorization_audit_log
            WHERE ($1::BIGINT IS NULL OR user_id = $1)
                AND ($2::BOOLEAN IS NULL OR granted = $2)
            ORDER BY occurred_at DESC, id DESC
            LIMIT $3
            OFFSET $4
            "#,
        )
        .bind(query.user_id.map(|user_id| user_id.as_i64()))
        .bind(query.granted)
        .bind(capped_limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list authorization audit records: {error}"))
        })?;

        rows.into_iter().map(AuditRow::into_entry).collect()
    }
}
