//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Invalid user ID: '{0}'")]
    InvalidId(String),

    #[error("Name is required")]
    EmptyName,

    #[error("Name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Email is required")]
    EmptyEmail,

    #[error("Email '{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MAX_NAME_LENGTH: usize = 100;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Default minimum password length when none is configured
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Validate and normalize a display name
///
/// Surrounding whitespace is removed; the result must be non-empty.
pub fn validate_name(name: &str) -> Result<String, UserValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(UserValidationError::EmptyName);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(name.to_string())
}

/// Validate and normalize an email address
///
/// Emails are trimmed and lowercased so the uniqueness check is
/// case-insensitive.
pub fn validate_email(email: &str) -> Result<String, UserValidationError> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if !EMAIL_PATTERN.is_match(&email) {
        return Err(UserValidationError::InvalidEmail(email));
    }

    Ok(email)
}

/// Validate a raw password against the configured minimum length
pub fn validate_password(password: &str, min_length: usize) -> Result<(), UserValidationError> {
    let length = password.chars().count();

    if length < min_length {
        return Err(UserValidationError::PasswordTooShort(min_length));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}
