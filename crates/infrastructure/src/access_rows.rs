use chrono::{DateTime, Utc};
use sqlx::FromRow;

use blablabook_application::{PermissionDefinition, RoleDefinition, UserRoleAssignment};
use blablabook_core::{AppError, AppResult, UserId};
use blablabook_domain::{PermissionId, PermissionLabel, RoleId, RoleName};

#[derive(Debug, FromRow)]
pub(crate) struct RoleRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
}

impl RoleRow {
    pub(crate) fn into_definition(self) -> AppResult<RoleDefinition> {
        let name = RoleName::new(self.name.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode role name '{}' for role '{}': {error}",
                self.name, self.id
            ))
        })?;

        Ok(RoleDefinition {
            role_id: RoleId::new(self.id),
            name,
            description: self.description,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PermissionRow {
    pub(crate) id: i64,
    pub(crate) label: String,
    pub(crate) action: String,
}

impl PermissionRow {
    pub(crate) fn into_definition(self) -> AppResult<PermissionDefinition> {
        let label = PermissionLabel::new(self.label.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode permission label '{}' for permission '{}': {error}",
                self.label, self.id
            ))
        })?;

        Ok(PermissionDefinition {
            permission_id: PermissionId::new(self.id),
            label,
            action: self.action,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct AssignmentRow {
    pub(crate) user_id: i64,
    pub(crate) role_id: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) assigned_at: DateTime<Utc>,
}

impl AssignmentRow {
    pub(crate) fn into_assignment(self) -> AppResult<UserRoleAssignment> {
        let role = RoleRow {
            id: self.role_id,
            name: self.name,
            description: self.description,
        }
        .into_definition()?;

        Ok(UserRoleAssignment {
            user_id: UserId::new(self.user_id),
            role,
            assigned_at: self.assigned_at.to_rfc3339(),
        })
    }
}
