use super::*;

fn save_role_input(payload: SaveRoleRequest) -> ApiResult<SaveRoleInput> {
    Ok(SaveRoleInput {
        name: RoleName::new(payload.name)?,
        description: payload
            .description
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty()),
    })
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .access_admin_service
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .access_admin_service
        .get_role(RoleId::new(role_id))
        .await?;

    Ok(Json(role.into()))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .access_admin_service
        .create_role(&user, save_role_input(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(role.into())))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<i64>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .access_admin_service
        .update_role(&user, RoleId::new(role_id), save_role_input(payload)?)
        .await?;

    Ok(Json(role.into()))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .access_admin_service
        .delete_role(&user, RoleId::new(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
