//! Password hashing utilities using Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash,
        PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Derive a salted adaptive hash from a plaintext password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a stored hash
    ///
    /// Returns `Ok(false)` on any mismatch; fails only with
    /// [`DomainError::InvalidHash`] when the stored hash cannot be parsed
    /// or verified at all.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}

/// Argon2-based password hasher with a fresh random salt per hash
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a new Argon2 hasher at default (adaptive) parameters
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::invalid_hash(format!("failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| DomainError::invalid_hash(format!("cannot parse stored hash: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(DomainError::invalid_hash(format!(
                "cannot verify stored hash: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hash).unwrap());
        assert!(!hasher.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_unique() {
        let hasher = Argon2Hasher::new();
        let password = "my_secure_password";

        let hash1 = hasher.hash(password).unwrap();
        let hash2 = hasher.hash(password).unwrap();

        // Random salt, so the same password yields different hashes
        assert_ne!(hash1, hash2);

        assert!(hasher.verify(password, &hash1).unwrap());
        assert!(hasher.verify(password, &hash2).unwrap());
    }

    #[test]
    fn test_verify_malformed_hash_is_an_error() {
        let hasher = Argon2Hasher::new();

        let result = hasher.verify("password", "not_a_phc_string");
        assert!(matches!(result, Err(DomainError::InvalidHash { .. })));

        let result = hasher.verify("password", "");
        assert!(matches!(result, Err(DomainError::InvalidHash { .. })));
    }

    #[test]
    fn test_short_password_is_hashable() {
        let hasher = Argon2Hasher::new();

        let hash = hasher.hash("pw1").unwrap();
        assert!(hasher.verify("pw1", &hash).unwrap());
    }
}
