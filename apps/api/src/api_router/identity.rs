use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};

use crate::state::AppState;
use crate::{auth, middleware};

pub(super) fn build_public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/logout", post(auth::logout_handler))
}

pub(super) fn build_self_service_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(auth::me_handler))
        .route(
            "/api/profile",
            put(auth::update_profile_handler).delete(auth::delete_profile_handler),
        )
        .route_layer(from_fn(middleware::require_auth))
}
