use super::*;

impl AccessAdminService {
    /// Lists every role.
    pub async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        self.repository.list_roles().await
    }

    /// Returns one role.
    pub async fn get_role(&self, role_id: RoleId) -> AppResult<RoleDefinition> {
        self.existing_role(role_id).await
    }

    /// Creates a role with a unique name.
    pub async fn create_role(
        &self,
        actor: &UserIdentity,
        input: SaveRoleInput,
    ) -> AppResult<RoleDefinition> {
        if self.repository.find_role_by_name(&input.name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                input.name
            )));
        }

        let role = self.repository.create_role(input).await?;
        info!(actor = %actor.id(), role_id = %role.role_id, role = %role.name, "role created");
        Ok(role)
    }

    /// Renames or re-describes a role.
    pub async fn update_role(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        input: SaveRoleInput,
    ) -> AppResult<RoleDefinition> {
        self.existing_role(role_id).await?;

        if let Some(existing) = self.repository.find_role_by_name(&input.name).await?
            && existing.role_id != role_id
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                input.name
            )));
        }

        let role = self.repository.update_role(role_id, input).await?;
        info!(actor = %actor.id(), role_id = %role.role_id, role = %role.name, "role updated");
        Ok(role)
    }

    /// Deletes a role, its grants and its assignments.
    pub async fn delete_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<()> {
        let role = self.existing_role(role_id).await?;
        self.repository.delete_role(role_id).await?;
        info!(actor = %actor.id(), role_id = %role_id, role = %role.name, "role deleted");
        Ok(())
    }
}
