//! Credential repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::PublicUser;
use crate::domain::DomainError;

/// Repository trait for the user credential store
///
/// Implementations must execute every mutating operation's
/// load/compute/replace cycle as one critical section relative to all other
/// operations on the same backing store, so that two concurrent creates can
/// never observe the same id ceiling or both pass the uniqueness check.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Look up a user by exact, case-sensitive username
    ///
    /// Read-only; usernames are unique so at most one record matches.
    async fn find(&self, username: &str) -> Result<Option<PublicUser>, DomainError>;

    /// Create a new user with a freshly salted and hashed password
    ///
    /// Fails with [`DomainError::DuplicateUser`] if the username is taken;
    /// nothing is written in that case.
    async fn create(&self, username: &str, password: &str) -> Result<PublicUser, DomainError>;

    /// Delete a user after verifying their password
    ///
    /// Fails with [`DomainError::UserNotFound`] for an unknown username,
    /// [`DomainError::MissingCredential`] if the record has no hash, and
    /// [`DomainError::IncorrectPassword`] on verification failure. No file
    /// write happens on any failure path.
    async fn delete(&self, username: &str, password: &str) -> Result<(), DomainError>;

    /// List every user, hash field stripped
    async fn list_all(&self) -> Result<Vec<PublicUser>, DomainError>;

    /// Verify a plaintext password against a stored hash
    ///
    /// Returns `Ok(false)` on any mismatch; fails only with
    /// [`DomainError::InvalidHash`] when the stored hash is malformed.
    async fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, DomainError>;
}
