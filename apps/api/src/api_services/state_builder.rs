use std::sync::Arc;

use blablabook_application::{
    AccessAdminService, AuthorizationAuditService, AuthorizationService, UserService,
};
use blablabook_core::AppError;
use blablabook_infrastructure::{
    Argon2PasswordHasher, PostgresAccessAdminRepository, PostgresAuthorizationAuditRepository,
    PostgresAuthorizationRepository, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::redis::build_redis_client;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> Result<AppState, AppError> {
    let redis_client = config
        .redis_url
        .as_deref()
        .map(build_redis_client)
        .transpose()?;

    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let access_repository = Arc::new(PostgresAccessAdminRepository::new(pool.clone()));
    let authorization_service =
        AuthorizationService::new(Arc::new(PostgresAuthorizationRepository::new(pool.clone())));

    Ok(AppState {
        user_service: UserService::new(
            user_repository.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            access_repository.clone(),
            config.default_user_role.clone(),
        ),
        access_admin_service: AccessAdminService::new(
            access_repository,
            user_repository,
            authorization_service.clone(),
        ),
        authorization_audit_service: AuthorizationAuditService::new(Arc::new(
            PostgresAuthorizationAuditRepository::new(pool.clone()),
        )),
        authorization_service,
        frontend_url: config.frontend_url.clone(),
        trusted_proxies: config.trusted_proxies.clone().into(),
        postgres_pool: Some(pool),
        redis_client,
        redis_required: config.requires_redis(),
    })
}
