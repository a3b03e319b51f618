use std::sync::Arc;

use blablabook_application::{
    AccessAdminService, AuthorizationAuditService, AuthorizationService, UserService,
};
use ipnet::IpNet;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub authorization_service: AuthorizationService,
    pub authorization_audit_service: AuthorizationAuditService,
    pub access_admin_service: AccessAdminService,
    pub frontend_url: String,
    pub trusted_proxies: Arc<[IpNet]>,
    /// Absent when the API runs on in-memory adapters.
    pub postgres_pool: Option<PgPool>,
    pub redis_client: Option<redis::Client>,
    pub redis_required: bool,
}
