use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Backing file unreadable, unwritable, or malformed under the
    /// fail-closed policy
    #[error("I/O failure: {message}")]
    Io { message: String },

    #[error("username '{username}' already exists")]
    DuplicateUser { username: String },

    #[error("user '{username}' not found")]
    UserNotFound { username: String },

    /// Delete target carries no password hash; a data-integrity anomaly,
    /// not a user error
    #[error("user '{username}' has no stored password hash")]
    MissingCredential { username: String },

    /// Password verification failed; an authorization failure, not a
    /// system error
    #[error("incorrect password")]
    IncorrectPassword,

    #[error("stored password hash is malformed: {message}")]
    InvalidHash { message: String },

    #[error("validation error: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn duplicate_user(username: impl Into<String>) -> Self {
        Self::DuplicateUser {
            username: username.into(),
        }
    }

    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound {
            username: username.into(),
        }
    }

    pub fn missing_credential(username: impl Into<String>) -> Self {
        Self::MissingCredential {
            username: username.into(),
        }
    }

    pub fn invalid_hash(message: impl Into<String>) -> Self {
        Self::InvalidHash {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
