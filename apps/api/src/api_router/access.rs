use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, put};
use blablabook_domain::BuiltinPermission;

use crate::handlers::access as handlers;
use crate::handlers::audit::list_authorization_audit_handler;
use crate::middleware::{PermissionGate, permission_gate};
use crate::state::AppState;

fn gate(
    app_state: AppState,
    required: BuiltinPermission,
    resource: &'static str,
) -> PermissionGate {
    PermissionGate::new(app_state, required.label(), Some(resource))
}

pub(super) fn build_role_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/roles",
            get(handlers::list_roles_handler).post(handlers::create_role_handler),
        )
        .route(
            "/api/roles/{id}",
            get(handlers::get_role_handler)
                .put(handlers::update_role_handler)
                .delete(handlers::delete_role_handler),
        )
        .route(
            "/api/roles/{id}/permissions",
            get(handlers::list_role_permissions_handler),
        )
        .route(
            "/api/roles/{id}/permissions/{permission_id}",
            put(handlers::grant_permission_handler).delete(handlers::revoke_permission_handler),
        )
        .route_layer(from_fn_with_state(
            gate(app_state, BuiltinPermission::AdminRoles, "role"),
            permission_gate,
        ))
}

pub(super) fn build_permission_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/permissions",
            get(handlers::list_permissions_handler).post(handlers::create_permission_handler),
        )
        .route(
            "/api/permissions/{id}",
            delete(handlers::delete_permission_handler),
        )
        .route_layer(from_fn_with_state(
            gate(app_state, BuiltinPermission::AdminRoles, "permission"),
            permission_gate,
        ))
}

pub(super) fn build_user_access_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/users/{id}/roles", get(handlers::list_user_roles_handler))
        .route(
            "/api/users/{id}/roles/{role_id}",
            put(handlers::assign_role_handler).delete(handlers::unassign_role_handler),
        )
        .route(
            "/api/users/{id}/permissions",
            get(handlers::user_permissions_handler),
        )
        .route_layer(from_fn_with_state(
            gate(app_state, BuiltinPermission::AdminUsers, "user"),
            permission_gate,
        ))
}

pub(super) fn build_audit_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/audit/authorizations",
            get(list_authorization_audit_handler),
        )
        .route_layer(from_fn_with_state(
            gate(app_state, BuiltinPermission::AdminAudit, "audit"),
            permission_gate,
        ))
}
