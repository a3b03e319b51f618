use super::*;

impl InMemoryIdentityStore {
    pub(super) async fn insert_role(&self, input: SaveRoleInput) -> AppResult<RoleDefinition> {
        let mut state = self.state.write().await;
        if state.role_named(&input.name).is_some() {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                input.name
            )));
        }

        state.next_role_id += 1;
        let role = RoleDefinition {
            role_id: RoleId::new(state.next_role_id),
            name: input.name,
            description: input.description,
        };

        state.roles.insert(role.role_id, role.clone());
        Ok(role)
    }

    pub(super) async fn replace_role(
        &self,
        role_id: RoleId,
        input: SaveRoleInput,
    ) -> AppResult<RoleDefinition> {
        let mut state = self.state.write().await;
        if state
            .role_named(&input.name)
            .is_some_and(|existing| existing.role_id != role_id)
        {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                input.name
            )));
        }

        let role = state
            .roles
            .get_mut(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        role.name = input.name;
        role.description = input.description;
        Ok(role.clone())
    }

    pub(super) async fn remove_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.roles.remove(&role_id).is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        state.grants.retain(|(role, _)| *role != role_id);
        state.assignments.retain(|(_, role), _| *role != role_id);
        Ok(())
    }

    pub(super) async fn insert_permission(
        &self,
        input: CreatePermissionInput,
    ) -> AppResult<PermissionDefinition> {
        let mut state = self.state.write().await;
        if state.permission_labelled(&input.label).is_some() {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                input.label
            )));
        }

        state.next_permission_id += 1;
        let permission = PermissionDefinition {
            permission_id: PermissionId::new(state.next_permission_id),
            label: input.label,
            action: input.action,
        };

        state
            .permissions
            .insert(permission.permission_id, permission.clone());
        Ok(permission)
    }

    pub(super) async fn remove_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.permissions.remove(&permission_id).is_none() {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            )));
        }

        state
            .grants
            .retain(|(_, permission)| *permission != permission_id);
        Ok(())
    }

    pub(super) async fn insert_grant(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }
        if !state.permissions.contains_key(&permission_id) {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            )));
        }

        if !state.grants.insert((role_id, permission_id)) {
            return Err(AppError::Conflict(format!(
                "permission '{permission_id}' is already granted to role '{role_id}'"
            )));
        }
        Ok(())
    }

    pub(super) async fn remove_grant(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        if !self
            .state
            .write()
            .await
            .grants
            .remove(&(role_id, permission_id))
        {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' is not granted to role '{role_id}'"
            )));
        }
        Ok(())
    }

    pub(super) async fn insert_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }
        if !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        if state.assignments.contains_key(&(user_id, role_id)) {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is already assigned to user '{user_id}'"
            )));
        }

        state.assignments.insert((user_id, role_id), Utc::now());
        Ok(())
    }

    pub(super) async fn remove_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        if self
            .state
            .write()
            .await
            .assignments
            .remove(&(user_id, role_id))
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' is not assigned to user '{user_id}'"
            )));
        }
        Ok(())
    }
}
