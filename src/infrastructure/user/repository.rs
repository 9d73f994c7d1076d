//! File-backed credential repository
//!
//! Every operation loads the full record set through the store accessor,
//! computes a new set in memory, and (for mutations) replaces the file
//! before returning. A single reader/writer lock owned by the repository
//! spans the whole load/compute/replace cycle. The value the lock guards is
//! the highest id this instance has ever assigned, so id allocation is
//! serialized by the same lock that serializes file access.
//!
//! The lock is process-local. Independent processes sharing the backing
//! file still race on uniqueness and id assignment even though the atomic
//! rename bounds file corruption.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::user::{
    validate_password, validate_username, PublicUser, User, UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::store::FileStore;

use super::password::PasswordHasher;

/// File-backed implementation of [`UserRepository`]
#[derive(Debug)]
pub struct FileUserRepository<H: PasswordHasher> {
    store: FileStore,
    hasher: Arc<H>,
    /// Highest id ever assigned by this instance; doubles as the
    /// critical-section lock around every load/compute/replace cycle
    last_id: RwLock<u64>,
}

impl<H: PasswordHasher> FileUserRepository<H> {
    /// Create a repository over the given store and hasher
    pub fn new(store: FileStore, hasher: Arc<H>) -> Self {
        Self {
            store,
            hasher,
            last_id: RwLock::new(0),
        }
    }

    /// The underlying store accessor
    pub fn store(&self) -> &FileStore {
        &self.store
    }
}

#[async_trait]
impl<H: PasswordHasher> UserRepository for FileUserRepository<H> {
    async fn find(&self, username: &str) -> Result<Option<PublicUser>, DomainError> {
        let _guard = self.last_id.read().await;
        let users = self.store.load().await?;

        Ok(users
            .iter()
            .find(|u| u.username() == username)
            .map(PublicUser::from))
    }

    async fn create(&self, username: &str, password: &str) -> Result<PublicUser, DomainError> {
        validate_username(username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut last_id = self.last_id.write().await;
        let mut users = self.store.load().await?;

        if users.iter().any(|u| u.username() == username) {
            return Err(DomainError::duplicate_user(username));
        }

        // Never below the live maximum, never at or below an id this
        // instance already handed out
        let live_max = users.iter().map(User::id).max().unwrap_or(0);
        let id = live_max.max(*last_id) + 1;

        let password_hash = self.hasher.hash(password)?;
        let user = User::new(id, username, password_hash);

        users.push(user.clone());
        self.store.replace(&users).await?;
        *last_id = id;

        debug!("created user '{}' with id {}", username, id);
        Ok(PublicUser::from(user))
    }

    async fn delete(&self, username: &str, password: &str) -> Result<(), DomainError> {
        let _guard = self.last_id.write().await;
        let mut users = self.store.load().await?;

        let index = users
            .iter()
            .position(|u| u.username() == username)
            .ok_or_else(|| DomainError::user_not_found(username))?;

        if !users[index].has_password_hash() {
            return Err(DomainError::missing_credential(username));
        }

        if !self
            .hasher
            .verify(password, users[index].password_hash())?
        {
            return Err(DomainError::IncorrectPassword);
        }

        users.remove(index);
        self.store.replace(&users).await?;

        debug!("deleted user '{}'", username);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<PublicUser>, DomainError> {
        let _guard = self.last_id.read().await;
        let users = self.store.load().await?;

        Ok(users.iter().map(PublicUser::from).collect())
    }

    async fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<bool, DomainError> {
        self.hasher.verify(password, stored_hash)
    }
}
