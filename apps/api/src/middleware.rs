use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use blablabook_core::{AppError, UserIdentity};
use tower_sessions::Session;
use url::{Origin, Url};

use crate::auth::SESSION_USER_KEY;
use crate::error::ApiResult;
use crate::state::AppState;

mod permission_gate;
mod request_context;

pub use permission_gate::{PermissionGate, permission_gate};

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Rejects state-changing requests that a browser reports as cross-site, or
/// whose `Origin` (falling back to `Referer`) is not the frontend's origin.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if !is_state_changing_method(request.method()) {
        return Ok(next.run(request).await);
    }

    let headers = request.headers();
    if header_text(headers, "sec-fetch-site") == Some("cross-site") {
        return Err(AppError::Forbidden("cross-site request blocked".to_owned()).into());
    }

    let claimed_origin = header_text(headers, header::ORIGIN.as_str())
        .or_else(|| header_text(headers, header::REFERER.as_str()))
        .and_then(origin_of);
    let frontend_origin = origin_of(state.frontend_url.as_str());

    match (claimed_origin, frontend_origin) {
        (Some(claimed), Some(frontend)) if claimed == frontend => Ok(next.run(request).await),
        _ => Err(AppError::Forbidden("origin validation failed".to_owned()).into()),
    }
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Scheme, host and port of an absolute http(s) URL.
fn origin_of(value: &str) -> Option<Origin> {
    Url::parse(value)
        .ok()
        .map(|url| url.origin())
        .filter(Origin::is_tuple)
}

/// Reads the signed-in identity; a broken session store is an internal error.
pub(crate) async fn session_identity(session: &Session) -> ApiResult<Option<UserIdentity>> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session identity: {error}")).into()
        })
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
