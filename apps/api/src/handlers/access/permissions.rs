use super::*;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .access_admin_service
        .list_permissions()
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .access_admin_service
        .create_permission(
            &user,
            CreatePermissionInput {
                label: PermissionLabel::new(payload.label)?,
                action: payload.action,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(permission.into())))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .access_admin_service
        .delete_permission(&user, PermissionId::new(permission_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .access_admin_service
        .list_role_permissions(RoleId::new(role_id))
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn grant_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((role_id, permission_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .access_admin_service
        .grant_permission(
            &user,
            RoleId::new(role_id),
            PermissionId::new(permission_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((role_id, permission_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .access_admin_service
        .revoke_permission(
            &user,
            RoleId::new(role_id),
            PermissionId::new(permission_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
