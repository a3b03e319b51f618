use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::{PermissionLabel, RoleId};

use crate::{PermissionDefinition, RoleDefinition};

/// Repository port for the user → role → permission traversal.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Returns whether a user account exists.
    async fn user_exists(&self, user_id: UserId) -> AppResult<bool>;

    /// Lists the roles assigned to a user.
    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleDefinition>>;

    /// Lists the permissions granted to a role.
    async fn list_permissions_for_role(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<PermissionDefinition>>;
}

/// Resource a permission check applies to, reported back on denial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessTarget {
    /// Resource name configured on the route.
    pub resource: Option<String>,
    /// Resource identifier taken from the request.
    pub resource_id: Option<String>,
}

/// Application service resolving effective permissions.
///
/// Nothing is cached: every call traverses current assignments, so a
/// revocation is visible to the next check.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Returns the union of permission labels reachable through the user's roles.
    ///
    /// Unknown users resolve to the empty set. Store failures are reported as
    /// `AppError::Unavailable` so they are never mistaken for "no permissions".
    pub async fn resolve_permissions(
        &self,
        user_id: UserId,
    ) -> AppResult<BTreeSet<PermissionLabel>> {
        let exists = self
            .repository
            .user_exists(user_id)
            .await
            .map_err(|error| resolution_failure(user_id, error))?;

        if !exists {
            debug!(%user_id, "permission lookup for unknown user");
            return Ok(BTreeSet::new());
        }

        let roles = self
            .repository
            .list_roles_for_user(user_id)
            .await
            .map_err(|error| resolution_failure(user_id, error))?;

        let mut permissions = BTreeSet::new();
        for role in roles {
            let grants = self
                .repository
                .list_permissions_for_role(role.role_id)
                .await
                .map_err(|error| resolution_failure(user_id, error))?;

            permissions.extend(grants.into_iter().map(|grant| grant.label));
        }

        Ok(permissions)
    }

    /// Returns whether the user holds `required` or the `ADMIN` bypass.
    pub async fn is_authorized(
        &self,
        user_id: UserId,
        required: &PermissionLabel,
    ) -> AppResult<bool> {
        let permissions = self.resolve_permissions(user_id).await?;
        Ok(permissions_satisfy(&permissions, required))
    }

    /// Ensures the user holds `required`, reporting the target on denial.
    pub async fn require_permission(
        &self,
        user_id: UserId,
        required: &PermissionLabel,
        target: &AccessTarget,
    ) -> AppResult<()> {
        if self.is_authorized(user_id, required).await? {
            return Ok(());
        }

        Err(AppError::PermissionDenied {
            permission: required.as_str().to_owned(),
            resource: target.resource.clone(),
            resource_id: target.resource_id.clone(),
        })
    }
}

/// Returns whether a resolved permission set satisfies `required`.
#[must_use]
pub fn permissions_satisfy(
    permissions: &BTreeSet<PermissionLabel>,
    required: &PermissionLabel,
) -> bool {
    permissions.contains(required) || permissions.iter().any(PermissionLabel::is_admin)
}

fn resolution_failure(user_id: UserId, error: AppError) -> AppError {
    match error {
        AppError::Unavailable(message) => AppError::Unavailable(message),
        other => AppError::Unavailable(format!(
            "failed to resolve permissions for user '{user_id}': {other}"
        )),
    }
}
