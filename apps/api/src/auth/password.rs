use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use blablabook_application::AuthOutcome;
use blablabook_core::AppError;
use tower_sessions::Session;
use tracing::info;

use crate::dto::{LoginRequest, RegisterRequest, UserProfileResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::session_helpers::store_identity;

/// POST /api/auth/register - Create a new account with email+password.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfileResponse>)> {
    let user = state.user_service.register(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/auth/login - Establish a session for valid credentials.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<UserProfileResponse>> {
    let outcome = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    let AuthOutcome::Authenticated(user) = outcome else {
        return Err(AppError::Unauthorized("invalid email or password".to_owned()).into());
    };

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;
    store_identity(&session, &user.identity()).await?;

    info!(user_id = %user.id, "user signed in");
    Ok(Json(user.into()))
}
