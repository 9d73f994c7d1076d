//! User entity and its public projection

use serde::{Deserialize, Serialize};

/// A stored user record
///
/// Serialization covers all three fields with exactly these names; this is
/// the on-disk representation and the compatibility contract with external
/// consumers of the backing file. Only [`PublicUser`] ever crosses the
/// repository's public boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique, monotonic, 1-based identifier
    id: u64,
    /// Login name, unique and matched case-sensitively
    username: String,
    /// Opaque salted adaptive hash; empty only in records that predate the
    /// repository or were edited externally
    #[serde(default)]
    password_hash: String,
}

impl User {
    /// Create a new user record
    pub fn new(id: u64, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Whether the record carries a password hash at all
    pub fn has_password_hash(&self) -> bool {
        !self.password_hash.is_empty()
    }
}

/// A user record with the password hash stripped
///
/// The only representation ever returned across the repository's public
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: u64,
    pub username: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
