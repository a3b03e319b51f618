mod access;
mod audit;
mod auth;
mod common;

pub use access::{
    CreatePermissionRequest, PermissionResponse, RoleResponse, SaveRoleRequest,
    UserPermissionsResponse, UserRoleAssignmentResponse,
};
pub use audit::{AuthorizationAuditEntryResponse, AuthorizationAuditListQuery};
pub use auth::{
    CurrentUserResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserProfileResponse,
};
pub use common::{HealthDependencyStatus, HealthResponse};
