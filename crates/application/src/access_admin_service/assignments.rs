use super::*;

impl AccessAdminService {
    /// Lists the role assignments of a user.
    pub async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<UserRoleAssignment>> {
        self.ensure_user_exists(user_id).await?;
        self.repository.list_user_role_assignments(user_id).await
    }

    /// Assigns a role to a user.
    pub async fn assign_role(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.ensure_user_exists(user_id).await?;
        let role = self.existing_role(role_id).await?;

        self.repository.assign_role_to_user(user_id, role_id).await?;

        info!(actor = %actor.id(), user_id = %user_id, role = %role.name, "role assigned");
        Ok(())
    }

    /// Removes a role from a user.
    pub async fn unassign_role(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.ensure_user_exists(user_id).await?;
        let role = self.existing_role(role_id).await?;

        self.repository
            .remove_role_from_user(user_id, role_id)
            .await?;

        info!(actor = %actor.id(), user_id = %user_id, role = %role.name, "role unassigned");
        Ok(())
    }

    /// Returns the effective permissions of a user.
    pub async fn user_permissions(&self, user_id: UserId) -> AppResult<BTreeSet<PermissionLabel>> {
        self.ensure_user_exists(user_id).await?;
        self.authorization_service.resolve_permissions(user_id).await
    }
}
