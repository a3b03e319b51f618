use std::collections::BTreeSet;

use blablabook_application::{PermissionDefinition, RoleDefinition, UserRoleAssignment};
use blablabook_core::UserId;
use blablabook_domain::PermissionLabel;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            id: value.role_id.as_i64(),
            name: value.name.as_str().to_owned(),
            description: value.description,
        }
    }
}

/// Incoming payload for creating or updating a role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-role-request.ts"
)]
pub struct SaveRoleRequest {
    pub name: String,
    pub description: Option<String>,
}

/// API representation of a permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub label: String,
    pub action: String,
}

impl From<PermissionDefinition> for PermissionResponse {
    fn from(value: PermissionDefinition) -> Self {
        Self {
            id: value.permission_id.as_i64(),
            label: value.label.as_str().to_owned(),
            action: value.action,
        }
    }
}

/// Incoming payload for creating a permission.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-permission-request.ts"
)]
pub struct CreatePermissionRequest {
    pub label: String,
    pub action: String,
}

/// Role held by a user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-role-assignment-response.ts"
)]
pub struct UserRoleAssignmentResponse {
    #[ts(type = "number")]
    pub user_id: i64,
    pub role: RoleResponse,
    pub assigned_at: String,
}

impl From<UserRoleAssignment> for UserRoleAssignmentResponse {
    fn from(value: UserRoleAssignment) -> Self {
        Self {
            user_id: value.user_id.as_i64(),
            role: value.role.into(),
            assigned_at: value.assigned_at,
        }
    }
}

/// Effective permissions of a user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-permissions-response.ts"
)]
pub struct UserPermissionsResponse {
    #[ts(type = "number")]
    pub user_id: i64,
    pub permissions: Vec<String>,
}

impl UserPermissionsResponse {
    pub fn new(user_id: UserId, permissions: BTreeSet<PermissionLabel>) -> Self {
        Self {
            user_id: user_id.as_i64(),
            permissions: permissions
                .into_iter()
                .map(|label| label.as_str().to_owned())
                .collect(),
        }
    }
}
