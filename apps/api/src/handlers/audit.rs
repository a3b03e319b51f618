use axum::Json;
use axum::extract::{Query, State};

use blablabook_application::AuthorizationAuditQuery;
use blablabook_core::UserId;

use crate::dto::{AuthorizationAuditEntryResponse, AuthorizationAuditListQuery};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_authorization_audit_handler(
    State(state): State<AppState>,
    Query(query): Query<AuthorizationAuditListQuery>,
) -> ApiResult<Json<Vec<AuthorizationAuditEntryResponse>>> {
    let query = AuthorizationAuditQuery::new(
        query.limit,
        query.offset,
        query.user_id.map(UserId::new),
        query.granted,
    )?;

    let entries = state
        .authorization_audit_service
        .list_recent_records(query)
        .await?
        .into_iter()
        .map(AuthorizationAuditEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
