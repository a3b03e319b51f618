//! Application services and ports.

#![forbid(unsafe_code)]

mod access_admin_service;
mod access_ports;
mod authorization_audit_service;
mod authorization_service;
mod user_service;

#[cfg(test)]
mod test_fakes;

pub use access_admin_service::AccessAdminService;
pub use access_ports::{
    AccessAdminRepository, CreatePermissionInput, PermissionDefinition, RoleDefinition,
    SaveRoleInput, UserRoleAssignment,
};
pub use authorization_audit_service::{
    AUDIT_DEFAULT_LIMIT, AUDIT_MAX_LIMIT, AuthorizationAuditEntry, AuthorizationAuditQuery,
    AuthorizationAuditRecord, AuthorizationAuditRepository, AuthorizationAuditService,
};
pub use authorization_service::{
    AccessTarget, AuthorizationRepository, AuthorizationService, permissions_satisfy,
};
pub use user_service::{
    AuthOutcome, NewUser, PERSON_NAME_MAX_LENGTH, PasswordHasher, ProfileChanges,
    RegisterParams, UpdateProfileParams, UserRecord, UserRepository, UserService,
};
