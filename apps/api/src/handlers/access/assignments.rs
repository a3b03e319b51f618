use super::*;

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<UserRoleAssignmentResponse>>> {
    let assignments = state
        .access_admin_service
        .list_user_roles(UserId::new(user_id))
        .await?
        .into_iter()
        .map(UserRoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .access_admin_service
        .assign_role(&user, UserId::new(user_id), RoleId::new(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .access_admin_service
        .unassign_role(&user, UserId::new(user_id), RoleId::new(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn user_permissions_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    let user_id = UserId::new(user_id);
    let permissions = state.access_admin_service.user_permissions(user_id).await?;

    Ok(Json(UserPermissionsResponse::new(user_id, permissions)))
}
