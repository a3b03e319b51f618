use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use blablabook_application::{CreatePermissionInput, SaveRoleInput};
use blablabook_core::{UserId, UserIdentity};
use blablabook_domain::{PermissionId, PermissionLabel, RoleId, RoleName};

use crate::dto::{
    CreatePermissionRequest, PermissionResponse, RoleResponse, SaveRoleRequest,
    UserPermissionsResponse, UserRoleAssignmentResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod assignments;
mod permissions;
mod roles;

pub use assignments::{
    assign_role_handler, list_user_roles_handler, unassign_role_handler,
    user_permissions_handler,
};
pub use permissions::{
    create_permission_handler, delete_permission_handler, grant_permission_handler,
    list_permissions_handler, list_role_permissions_handler, revoke_permission_handler,
};
pub use roles::{
    create_role_handler, delete_role_handler, get_role_handler, list_roles_handler,
    update_role_handler,
};
