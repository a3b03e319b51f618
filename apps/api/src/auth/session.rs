use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use blablabook_core::UserIdentity;
use tower_sessions::Session;
use tracing::info;

use crate::dto::CurrentUserResponse;
use crate::error::ApiResult;
use crate::middleware::session_identity;
use crate::state::AppState;

use super::session_helpers::{current_account, delete_session};

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    if let Some(identity) = session_identity(&session).await? {
        info!(user_id = %identity.id(), "user signed out");
    }

    delete_session(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    session: Session,
) -> ApiResult<Json<CurrentUserResponse>> {
    let user = current_account(&state, &session, &identity).await?;
    let permissions = state
        .authorization_service
        .resolve_permissions(user.id)
        .await?;

    Ok(Json(CurrentUserResponse::new(user, permissions)))
}
