//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod security;
mod user;

pub use security::{
    ACCESS_NAME_MAX_LENGTH, AuthorizationOutcome, BuiltinPermission, PermissionId,
    PermissionLabel, RoleId, RoleName,
};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH,
    USERNAME_MIN_LENGTH, Username, validate_password,
};
