//! User account ports and application service.
//!
//! Owns registration, credential checks and profile maintenance. Login
//! failures stay generic so callers cannot probe for registered emails.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use blablabook_core::{AppError, AppResult, UserId, UserIdentity};
use blablabook_domain::RoleName;

use crate::AccessAdminRepository;

mod login;
mod profile;
mod registration;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical lower-cased email address.
    pub email: String,
    /// Unique public username.
    pub username: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Optional first name.
    pub firstname: Option<String>,
    /// Optional last name.
    pub lastname: Option<String>,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Projects the record into the identity stored in the session.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.id,
            self.email.as_str(),
            self.username.as_str(),
            self.firstname.clone(),
            self.lastname.clone(),
        )
    }
}

/// Validated account ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Canonical email address.
    pub email: String,
    /// Unique public username.
    pub username: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Optional first name.
    pub firstname: Option<String>,
    /// Optional last name.
    pub lastname: Option<String>,
}

/// Full replacement of the editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    /// Unique public username.
    pub username: String,
    /// Optional first name.
    pub firstname: Option<String>,
    /// Optional last name.
    pub lastname: Option<String>,
}

/// Repository port for user persistence.
///
/// Adapters report email or username collisions as `AppError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserRecord>>;

    /// Creates a new user record.
    async fn create(&self, user: NewUser) -> AppResult<UserRecord>;

    /// Replaces the editable profile fields.
    async fn update_profile(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> AppResult<UserRecord>;

    /// Deletes a user and their role assignments.
    async fn delete(&self, user_id: UserId) -> AppResult<()>;
}

/// Port for password hashing operations. Keeps the application layer free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Authentication outcome
// ---------------------------------------------------------------------------

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Credentials matched. A session can be established.
    Authenticated(UserRecord),
    /// Credentials did not match. Generic to prevent enumeration.
    Failed,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Longest accepted first or last name.
pub const PERSON_NAME_MAX_LENGTH: usize = 64;

/// Parameters for user registration.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    /// Email address for the new account.
    pub email: String,
    /// Public username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
    /// Optional first name.
    pub firstname: Option<String>,
    /// Optional last name.
    pub lastname: Option<String>,
}

/// Parameters for a profile update. `None` keeps the stored value; an empty
/// first or last name clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileParams {
    /// New username.
    pub username: Option<String>,
    /// New first name.
    pub firstname: Option<String>,
    /// New last name.
    pub lastname: Option<String>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for user registration, authentication and profiles.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    access_repository: Arc<dyn AccessAdminRepository>,
    default_role: Option<RoleName>,
}

impl UserService {
    /// Creates a new user service.
    ///
    /// `default_role` is assigned to every newly registered account when a
    /// role with that name exists.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        access_repository: Arc<dyn AccessAdminRepository>,
        default_role: Option<RoleName>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            access_repository,
            default_role,
        }
    }
}

fn normalize_person_name(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.chars().count() > PERSON_NAME_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "{field} must not exceed {PERSON_NAME_MAX_LENGTH} characters"
        )));
    }

    Ok(Some(trimmed.to_owned()))
}
