use super::*;

impl AccessAdminService {
    /// Lists every permission.
    pub async fn list_permissions(&self) -> AppResult<Vec<PermissionDefinition>> {
        self.repository.list_permissions().await
    }

    /// Creates a permission with a unique label.
    pub async fn create_permission(
        &self,
        actor: &UserIdentity,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        if input.action.trim().is_empty() {
            return Err(AppError::Validation(
                "permission action must not be empty".to_owned(),
            ));
        }

        if self
            .repository
            .find_permission_by_label(&input.label)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                input.label
            )));
        }

        let permission = self
            .repository
            .create_permission(CreatePermissionInput {
                label: input.label,
                action: input.action.trim().to_owned(),
            })
            .await?;

        info!(
            actor = %actor.id(),
            permission_id = %permission.permission_id,
            permission = %permission.label,
            "permission created"
        );
        Ok(permission)
    }

    /// Deletes a permission and every grant of it.
    pub async fn delete_permission(
        &self,
        actor: &UserIdentity,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let permission = self.existing_permission(permission_id).await?;
        self.repository.delete_permission(permission_id).await?;
        info!(
            actor = %actor.id(),
            permission_id = %permission_id,
            permission = %permission.label,
            "permission deleted"
        );
        Ok(())
    }

    /// Lists the permissions granted to a role.
    pub async fn list_role_permissions(
        &self,
        role_id: RoleId,
    ) -> AppResult<Vec<PermissionDefinition>> {
        self.existing_role(role_id).await?;
        self.repository.list_role_permissions(role_id).await
    }

    /// Grants a permission to a role.
    pub async fn grant_permission(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let role = self.existing_role(role_id).await?;
        let permission = self.existing_permission(permission_id).await?;

        self.repository
            .grant_permission_to_role(role_id, permission_id)
            .await?;

        info!(
            actor = %actor.id(),
            role = %role.name,
            permission = %permission.label,
            "permission granted to role"
        );
        Ok(())
    }

    /// Revokes a permission from a role.
    pub async fn revoke_permission(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let role = self.existing_role(role_id).await?;
        let permission = self.existing_permission(permission_id).await?;

        self.repository
            .revoke_permission_from_role(role_id, permission_id)
            .await?;

        info!(
            actor = %actor.id(),
            role = %role.name,
            permission = %permission.label,
            "permission revoked from role"
        );
        Ok(())
    }
}
