use std::sync::Arc;

use blablabook_application::{
    AccessAdminRepository, CreatePermissionInput, PermissionDefinition, RegisterParams,
    RoleDefinition, SaveRoleInput, UserRepository, UserService,
};
use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::{BuiltinPermission, RoleName};
use blablabook_infrastructure::{
    Argon2PasswordHasher, PostgresAccessAdminRepository, PostgresUserRepository,
};
use sqlx::PgPool;
use tracing::info;

use crate::api_config::{ApiConfig, SeedAdminConfig};

const ADMIN_ROLE: &str = "admin";
const ADMIN_ROLE_DESCRIPTION: &str = "Full access to every protected operation";
const USER_ROLE: &str = "user";
const USER_ROLE_DESCRIPTION: &str = "Default role for registered readers";
const USER_ROLE_PERMISSIONS: &[BuiltinPermission] = &[
    BuiltinPermission::Read,
    BuiltinPermission::Create,
    BuiltinPermission::Update,
    BuiltinPermission::Delete,
];

/// What a seed run changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub permissions_created: usize,
    pub roles_created: usize,
    pub grants_created: usize,
    pub admin_user: Option<UserId>,
}

pub async fn run(pool: PgPool, config: &ApiConfig) -> AppResult<()> {
    let access_repository = Arc::new(PostgresAccessAdminRepository::new(pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pool));
    let user_service = UserService::new(
        user_repository.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        access_repository.clone(),
        config.default_user_role.clone(),
    );

    let report = seed(
        access_repository.as_ref(),
        user_repository.as_ref(),
        &user_service,
        config.seed_admin.as_ref(),
    )
    .await?;

    info!(
        permissions_created = report.permissions_created,
        roles_created = report.roles_created,
        grants_created = report.grants_created,
        admin_user = report.admin_user.map(|user_id| user_id.as_i64()),
        "seed completed"
    );
    Ok(())
}

/// Ensures built-in permissions, the `admin` and `user` roles and, when
/// configured, an administrator account. Safe to run repeatedly.
pub async fn seed(
    access: &dyn AccessAdminRepository,
    users: &dyn UserRepository,
    user_service: &UserService,
    admin: Option<&SeedAdminConfig>,
) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    let mut permissions = Vec::with_capacity(BuiltinPermission::all().len());
    for builtin in BuiltinPermission::all() {
        permissions.push(ensure_permission(access, *builtin, &mut report).await?);
    }

    let admin_role = ensure_role(access, ADMIN_ROLE, ADMIN_ROLE_DESCRIPTION, &mut report).await?;
    ensure_grants(access, &admin_role, &permissions, &[BuiltinPermission::Admin], &mut report)
        .await?;

    let user_role = ensure_role(access, USER_ROLE, USER_ROLE_DESCRIPTION, &mut report).await?;
    ensure_grants(access, &user_role, &permissions, USER_ROLE_PERMISSIONS, &mut report).await?;

    if let Some(admin) = admin {
        let user_id = ensure_admin_account(access, users, user_service, admin, &admin_role).await?;
        report.admin_user = Some(user_id);
    }

    Ok(report)
}

async fn ensure_permission(
    access: &dyn AccessAdminRepository,
    builtin: BuiltinPermission,
    report: &mut SeedReport,
) -> AppResult<PermissionDefinition> {
    let label = builtin.label();
    if let Some(existing) = access.find_permission_by_label(&label).await? {
        return Ok(existing);
    }

    report.permissions_created += 1;
    access
        .create_permission(CreatePermissionInput {
            label,
            action: builtin.action().to_owned(),
        })
        .await
}

async fn ensure_role(
    access: &dyn AccessAdminRepository,
    name: &str,
    description: &str,
    report: &mut SeedReport,
) -> AppResult<RoleDefinition> {
    let name = RoleName::new(name)?;
    if let Some(existing) = access.find_role_by_name(&name).await? {
        return Ok(existing);
    }

    report.roles_created += 1;
    access
        .create_role(SaveRoleInput {
            name,
            description: Some(description.to_owned()),
        })
        .await
}

async fn ensure_grants(
    access: &dyn AccessAdminRepository,
    role: &RoleDefinition,
    permissions: &[PermissionDefinition],
    wanted: &[BuiltinPermission],
    report: &mut SeedReport,
) -> AppResult<()> {
    let granted = access.list_role_permissions(role.role_id).await?;

    for builtin in wanted {
        let label = builtin.label();
        if granted.iter().any(|grant| grant.label == label) {
            continue;
        }

        let permission = permissions
            .iter()
            .find(|permission| permission.label == label)
            .ok_or_else(|| AppError::Internal(format!("permission '{label}' was not seeded")))?;

        access
            .grant_permission_to_role(role.role_id, permission.permission_id)
            .await?;
        report.grants_created += 1;
    }

    Ok(())
}

async fn ensure_admin_account(
    access: &dyn AccessAdminRepository,
    users: &dyn UserRepository,
    user_service: &UserService,
    admin: &SeedAdminConfig,
    admin_role: &RoleDefinition,
) -> AppResult<UserId> {
    let user_id = match users.find_by_email(admin.email.trim()).await? {
        Some(existing) => existing.id,
        None => {
            user_service
                .register(RegisterParams {
                    email: admin.email.clone(),
                    username: admin.username.clone(),
                    password: admin.password.clone(),
                    firstname: None,
                    lastname: None,
                })
                .await?
                .id
        }
    };

    let assignments = access.list_user_role_assignments(user_id).await?;
    if !assignments
        .iter()
        .any(|assignment| assignment.role.role_id == admin_role.role_id)
    {
        access
            .assign_role_to_user(user_id, admin_role.role_id)
            .await?;
    }

    Ok(user_id)
}
