//! User domain types and validation rules.
//!
//! Password length limits follow NIST SP800-63B for accounts without a
//! second factor.

use blablabook_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Minimum username length.
pub const USERNAME_MIN_LENGTH: usize = 3;

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 32;

/// Public handle shown next to reviews and reading lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        let char_count = trimmed.chars().count();

        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&char_count) {
            return Err(AppError::Validation(format!(
                "username must be {USERNAME_MIN_LENGTH} to {USERNAME_MAX_LENGTH} characters long"
            )));
        }

        if !trimmed
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || "_.-".contains(character))
        {
            return Err(AppError::Validation(
                "username may only contain letters, digits, '_', '.' and '-'".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Minimum password length (NIST SP800-63B, single factor).
pub const PASSWORD_MIN_LENGTH: usize = 10;

/// Maximum password length to allow passphrases (OWASP recommendation: at least 64).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password.
///
/// - Min length is 10 characters.
/// - Max length is 128 characters (protects against Argon2id DoS).
/// - Rejects common breached passwords from an embedded list.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    if is_common_password(password) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|entry| *entry == lowered)
}

/// Breached passwords long enough to pass the length check.
static COMMON_PASSWORDS: &[&str] = &[
    "1234567890",
    "qwertyuiop",
    "password123",
    "password1234",
    "iloveyou123",
    "1q2w3e4r5t",
    "0987654321",
    "1111111111",
    "abcdefghij",
    "letmein123",
    "welcome123",
    "qwerty12345",
];
