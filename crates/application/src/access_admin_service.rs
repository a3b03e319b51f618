use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use blablabook_core::{AppError, AppResult, UserId, UserIdentity};
use blablabook_domain::{PermissionId, PermissionLabel, RoleId};

use crate::{
    AccessAdminRepository, AuthorizationService, CreatePermissionInput, PermissionDefinition,
    RoleDefinition, SaveRoleInput, UserRepository, UserRoleAssignment,
};

mod assignments;
mod permissions;
mod roles;

/// Application service for role, permission and assignment administration.
///
/// Callers are expected to sit behind the permission gate; this service
/// validates existence of referenced rows and logs every mutation with the
/// acting user.
#[derive(Clone)]
pub struct AccessAdminService {
    repository: Arc<dyn AccessAdminRepository>,
    user_repository: Arc<dyn UserRepository>,
    authorization_service: AuthorizationService,
}

impl AccessAdminService {
    /// Creates a new administration service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AccessAdminRepository>,
        user_repository: Arc<dyn UserRepository>,
        authorization_service: AuthorizationService,
    ) -> Self {
        Self {
            repository,
            user_repository,
            authorization_service,
        }
    }

    async fn existing_role(&self, role_id: RoleId) -> AppResult<RoleDefinition> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }

    async fn existing_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<PermissionDefinition> {
        self.repository
            .find_permission(permission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' does not exist"))
            })
    }

    async fn ensure_user_exists(&self, user_id: UserId) -> AppResult<()> {
        if self.user_repository.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }
        Ok(())
    }
}
