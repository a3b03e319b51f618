use serde::{Deserialize, Serialize};

use crate::UserId;

/// User information persisted in the authenticated session.
///
/// Permissions are never stored here; they are resolved from role
/// assignments on every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    id: UserId,
    email: String,
    username: String,
    firstname: Option<String>,
    lastname: Option<String>,
}

impl UserIdentity {
    /// Creates a session identity from an account record.
    #[must_use]
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        username: impl Into<String>,
        firstname: Option<String>,
        lastname: Option<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            username: username.into(),
            firstname,
            lastname,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the account email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the public username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the first name, if the user provided one.
    #[must_use]
    pub fn firstname(&self) -> Option<&str> {
        self.firstname.as_deref()
    }

    /// Returns the last name, if the user provided one.
    #[must_use]
    pub fn lastname(&self) -> Option<&str> {
        self.lastname.as_deref()
    }
}
