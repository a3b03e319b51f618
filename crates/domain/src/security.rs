use std::fmt::{Display, Formatter};
use std::str::FromStr;

use blablabook_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum length of a permission label or role name.
pub const ACCESS_NAME_MAX_LENGTH: usize = 64;

/// Numeric identifier of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i64);

impl RoleId {
    /// Wraps a stored role identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Numeric identifier of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(i64);

impl PermissionId {
    /// Wraps a stored permission identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Atomic capability label such as `CREATE` or `ADMIN_USERS`.
///
/// Labels are upper snake case. Construction trims and upper-cases input,
/// so `admin_users` and `ADMIN_USERS` are the same label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionLabel(String);

impl PermissionLabel {
    /// Creates a validated permission label.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let normalized = value.as_ref().trim().to_ascii_uppercase();

        if normalized.is_empty() || normalized.len() > ACCESS_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "permission label must be between 1 and {ACCESS_NAME_MAX_LENGTH} characters"
            )));
        }

        if !normalized.starts_with(|character: char| character.is_ascii_uppercase()) {
            return Err(AppError::Validation(format!(
                "permission label '{normalized}' must start with a letter"
            )));
        }

        if !normalized
            .chars()
            .all(|character| {
                character.is_ascii_uppercase() || character.is_ascii_digit() || character == '_'
            })
        {
            return Err(AppError::Validation(format!(
                "permission label '{normalized}' may only contain letters, digits and '_'"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the super-bypass label that satisfies every check.
    #[must_use]
    pub fn admin() -> Self {
        BuiltinPermission::Admin.label()
    }

    /// Returns whether this label is the super-bypass label.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0 == BuiltinPermission::Admin.as_str()
    }

    /// Returns the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PermissionLabel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl FromStr for PermissionLabel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for PermissionLabel {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionLabel> for String {
    fn from(value: PermissionLabel) -> Self {
        value.0
    }
}

/// Permissions seeded at installation and referenced by route guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuiltinPermission {
    /// Allows creating catalogue content.
    Create,
    /// Allows reading catalogue content.
    Read,
    /// Allows updating catalogue content.
    Update,
    /// Allows deleting catalogue content.
    Delete,
    /// Allows managing user role assignments.
    AdminUsers,
    /// Allows managing roles, permissions and grants.
    AdminRoles,
    /// Allows reading the authorization audit trail.
    AdminAudit,
    /// Satisfies every permission check.
    Admin,
}

impl BuiltinPermission {
    /// Returns the stored label for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::AdminUsers => "ADMIN_USERS",
            Self::AdminRoles => "ADMIN_ROLES",
            Self::AdminAudit => "ADMIN_AUDIT",
            Self::Admin => "ADMIN",
        }
    }

    /// Returns a human-readable description of the granted action.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::Create => "Create books, reviews and reading lists",
            Self::Read => "Read books, reviews and reading lists",
            Self::Update => "Update books, reviews and reading lists",
            Self::Delete => "Delete books, reviews and reading lists",
            Self::AdminUsers => "Manage user role assignments",
            Self::AdminRoles => "Manage roles, permissions and grants",
            Self::AdminAudit => "Read the authorization audit trail",
            Self::Admin => "Full access to every protected operation",
        }
    }

    /// Returns the permission as a validated label.
    #[must_use]
    pub fn label(&self) -> PermissionLabel {
        PermissionLabel(self.as_str().to_owned())
    }

    /// Returns all builtin permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[BuiltinPermission] = &[
            BuiltinPermission::Create,
            BuiltinPermission::Read,
            BuiltinPermission::Update,
            BuiltinPermission::Delete,
            BuiltinPermission::AdminUsers,
            BuiltinPermission::AdminRoles,
            BuiltinPermission::AdminAudit,
            BuiltinPermission::Admin,
        ];

        ALL
    }
}

impl FromStr for BuiltinPermission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown builtin permission '{value}'")))
    }
}

/// Unique, lower-cased role name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a validated role name.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let normalized = value.as_ref().trim().to_lowercase();

        if normalized.is_empty() || normalized.len() > ACCESS_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role name must be between 1 and {ACCESS_NAME_MAX_LENGTH} characters"
            )));
        }

        if !normalized.chars().all(|character| {
            character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || character == '_'
                || character == '-'
        }) {
            return Err(AppError::Validation(format!(
                "role name '{normalized}' may only contain letters, digits, '_' and '-'"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

/// Outcome of one authorization decision taken by the request gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationOutcome {
    /// Caller held the permission (or `ADMIN`).
    Granted,
    /// Caller was authenticated but lacked the permission.
    Denied,
    /// No usable session accompanied the request.
    Unauthenticated,
    /// Permissions could not be resolved from the backing store.
    ResolutionFailed,
}

impl AuthorizationOutcome {
    /// Returns a stable storage value for this outcome.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Unauthenticated => "unauthenticated",
            Self::ResolutionFailed => "resolution_failed",
        }
    }

    /// Returns whether access was granted.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl FromStr for AuthorizationOutcome {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "unauthenticated" => Ok(Self::Unauthenticated),
            "resolution_failed" => Ok(Self::ResolutionFailed),
            _ => Err(AppError::Validation(format!(
                "unknown authorization outcome '{value}'"
            ))),
        }
    }
}
