use blablabook_application::UserRecord;
use blablabook_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;

pub(super) async fn store_identity(session: &Session, identity: &UserIdentity) -> ApiResult<()> {
    session
        .insert(SESSION_USER_KEY, identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}")).into()
        })
}

pub(super) async fn delete_session(session: &Session) -> ApiResult<()> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")).into())
}

/// Loads the account behind a session identity. A session outliving its
/// account is flushed and reported as `INVALID_SESSION`.
pub(super) async fn current_account(
    state: &AppState,
    session: &Session,
    identity: &UserIdentity,
) -> ApiResult<UserRecord> {
    if let Some(user) = state.user_service.find_profile(identity.id()).await? {
        return Ok(user);
    }

    info!(user_id = %identity.id(), "session user no longer exists");
    session.flush().await.map_err(|error| {
        AppError::Internal(format!("failed to flush stale session: {error}"))
    })?;

    Err(AppError::InvalidSession("session user no longer exists".to_owned()).into())
}
