use blablabook_application::AuthorizationAuditEntry;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Query string accepted by the authorization audit listing.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/authorization-audit-list-query.ts"
)]
pub struct AuthorizationAuditListQuery {
    #[ts(type = "number | null")]
    pub limit: Option<usize>,
    #[ts(type = "number | null")]
    pub offset: Option<usize>,
    #[ts(type = "number | null")]
    pub user_id: Option<i64>,
    pub granted: Option<bool>,
}

/// One recorded authorization decision.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/authorization-audit-entry-response.ts"
)]
pub struct AuthorizationAuditEntryResponse {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number | null")]
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
    pub permission: String,
    pub resource: Option<String>,
    pub resource_id: Option<String>,
    pub outcome: String,
    pub granted: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub occurred_at: String,
}

impl From<AuthorizationAuditEntry> for AuthorizationAuditEntryResponse {
    fn from(value: AuthorizationAuditEntry) -> Self {
        let record = value.record;
        Self {
            id: value.entry_id,
            user_id: record.user_id.map(|user_id| user_id.as_i64()),
            granted: record.granted(),
            user_email: record.user_email,
            permission: record.permission.as_str().to_owned(),
            resource: record.resource,
            resource_id: record.resource_id,
            outcome: record.outcome.as_str().to_owned(),
            ip_address: record.ip_address,
            user_agent: record.user_agent,
            occurred_at: record.occurred_at.to_rfc3339(),
        }
    }
}
