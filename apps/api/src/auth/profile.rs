use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use blablabook_core::UserIdentity;
use tower_sessions::Session;

use crate::dto::{UpdateProfileRequest, UserProfileResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::{current_account, delete_session, store_identity};

/// PUT /api/profile - Update the signed-in account and refresh the session.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    session: Session,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfileResponse>> {
    let user = current_account(&state, &session, &identity).await?;
    let updated = state
        .user_service
        .update_profile(user.id, payload.into())
        .await?;

    store_identity(&session, &updated.identity()).await?;
    Ok(Json(updated.into()))
}

/// DELETE /api/profile - Delete the signed-in account and end the session.
pub async fn delete_profile_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    session: Session,
) -> ApiResult<StatusCode> {
    let user = current_account(&state, &session, &identity).await?;
    state.user_service.delete_account(user.id).await?;
    delete_session(&session).await?;

    Ok(StatusCode::NO_CONTENT)
}
