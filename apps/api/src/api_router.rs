use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use blablabook_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::service::SignedCookie;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{handlers, middleware};

mod access;
mod cors;
mod identity;

#[cfg(test)]
mod tests;

pub fn build_router<Store: SessionStore + Clone>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store, SignedCookie>,
) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(identity::build_public_auth_routes())
        .merge(identity::build_self_service_routes())
        .merge(access::build_role_routes(app_state.clone()))
        .merge(access::build_permission_routes(app_state.clone()))
        .merge(access::build_user_access_routes(app_state.clone()))
        .merge(access::build_audit_routes(app_state.clone()))
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}
