use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::{AuthorizationOutcome, PermissionLabel};

/// Default page size for audit listings.
pub const AUDIT_DEFAULT_LIMIT: usize = 50;

/// Largest page size accepted for audit listings.
pub const AUDIT_MAX_LIMIT: usize = 500;

/// One authorization decision taken by the request gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationAuditRecord {
    /// Acting user, when a session was present.
    pub user_id: Option<UserId>,
    /// Acting user email, when a session was present.
    pub user_email: Option<String>,
    /// Permission that was checked.
    pub permission: PermissionLabel,
    /// Resource name configured on the route.
    pub resource: Option<String>,
    /// Resource identifier taken from the request path.
    pub resource_id: Option<String>,
    /// Decision outcome.
    pub outcome: AuthorizationOutcome,
    /// Caller network address.
    pub ip_address: Option<String>,
    /// Caller user-agent.
    pub user_agent: Option<String>,
    /// Decision timestamp.
    pub occurred_at: DateTime<Utc>,
}

impl AuthorizationAuditRecord {
    /// Returns whether access was granted.
    #[must_use]
    pub fn granted(&self) -> bool {
        self.outcome.is_granted()
    }
}

/// Stored audit record with its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationAuditEntry {
    /// Stable entry identifier.
    pub entry_id: i64,
    /// Recorded decision.
    pub record: AuthorizationAuditRecord,
}

/// Query parameters for audit listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationAuditQuery {
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
    /// Optional acting user filter.
    pub user_id: Option<UserId>,
    /// Optional granted/denied filter.
    pub granted: Option<bool>,
}

impl AuthorizationAuditQuery {
    /// Builds a validated query, applying the default page size.
    pub fn new(
        limit: Option<usize>,
        offset: Option<usize>,
        user_id: Option<UserId>,
        granted: Option<bool>,
    ) -> AppResult<Self> {
        let limit = limit.unwrap_or(AUDIT_DEFAULT_LIMIT);
        if limit == 0 || limit > AUDIT_MAX_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {AUDIT_MAX_LIMIT}"
            )));
        }

        Ok(Self {
            limit,
            offset: offset.unwrap_or(0),
            user_id,
            granted,
        })
    }
}

/// Repository port for authorization audit persistence.
#[async_trait]
pub trait AuthorizationAuditRepository: Send + Sync {
    /// Appends one decision record.
    async fn append_record(&self, record: AuthorizationAuditRecord) -> AppResult<()>;

    /// Lists records newest first.
    async fn list_recent_records(
        &self,
        query: AuthorizationAuditQuery,
    ) -> AppResult<Vec<AuthorizationAuditEntry>>;
}

/// Application service recording every authorization decision.
#[derive(Clone)]
pub struct AuthorizationAuditService {
    repository: Arc<dyn AuthorizationAuditRepository>,
}

impl AuthorizationAuditService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationAuditRepository>) -> Self {
        Self { repository }
    }

    /// Logs the decision and persists it.
    pub async fn record_decision(&self, record: AuthorizationAuditRecord) -> AppResult<()> {
        let user_id = record.user_id.map(|value| value.as_i64());
        if record.granted() {
            info!(
                target: "blablabook::audit",
                user_id,
                user_email = record.user_email.as_deref(),
                permission = %record.permission,
                resource = record.resource.as_deref(),
                resource_id = record.resource_id.as_deref(),
                outcome = record.outcome.as_str(),
                ip_address = record.ip_address.as_deref(),
                "authorization granted"
            );
        } else {
            warn!(
                target: "blablabook::audit",
                user_id,
                user_email = record.user_email.as_deref(),
                permission = %record.permission,
                resource = record.resource.as_deref(),
                resource_id = record.resource_id.as_deref(),
                outcome = record.outcome.as_str(),
                ip_address = record.ip_address.as_deref(),
                "authorization refused"
            );
        }

        self.repository.append_record(record).await
    }

    /// Lists recorded decisions newest first.
    pub async fn list_recent_records(
        &self,
        query: AuthorizationAuditQuery,
    ) -> AppResult<Vec<AuthorizationAuditEntry>> {
        self.repository.list_recent_records(query).await
    }
}
