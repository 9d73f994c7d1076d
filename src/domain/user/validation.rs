//! Input validation for repository operations

use thiserror::Error;

/// Errors that can occur during user input validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username contains a control character")]
    UsernameControlCharacter,

    #[error("Password cannot be empty")]
    EmptyPassword,
}

/// Validate a username
///
/// Usernames are matched exactly and case-sensitively, so any printable
/// text is accepted; only empty names and control characters are rejected.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.chars().any(char::is_control) {
        return Err(UserValidationError::UsernameControlCharacter);
    }

    Ok(())
}

/// Validate a password
///
/// No length minimum beyond non-emptiness; the hash scheme accepts
/// arbitrary input and the store contract accepts short passwords.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    Ok(())
}
