//! Credstore
//!
//! A file-backed user credential store:
//! - One flat JSON file as the sole persisted representation of the record set
//! - Atomic whole-file replacement (write temporary file, then rename)
//! - Unique usernames and monotonic, never-reused numeric ids
//! - Argon2 password hashing and verification
//! - A single reader/writer lock serializing every load/compute/replace cycle
//!
//! The HTTP layer that calls into the store lives elsewhere; this crate only
//! exposes the async in-process API.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::user::{PublicUser, User, UserRepository};
pub use domain::DomainError;
pub use infrastructure::store::FileStore;
pub use infrastructure::user::{Argon2Hasher, FileUserRepository, PasswordHasher};

use std::sync::Arc;

use rand::Rng;
use tracing::info;

/// Create the file-backed repository from configuration
///
/// Wires the store accessor and the Argon2 hasher together and guarantees
/// the backing path exists before the first operation.
pub async fn create_repository(
    config: &AppConfig,
) -> anyhow::Result<FileUserRepository<Argon2Hasher>> {
    let store = FileStore::new(&config.store.path).with_policy(config.store.on_corrupt);
    store.ensure().await?;

    Ok(FileUserRepository::new(store, Arc::new(Argon2Hasher::new())))
}

/// Ensure an administrator account exists
///
/// Username comes from `ADMIN_USERNAME` (default `admin`); the password from
/// `ADMIN_PASSWORD`, or a random one logged once at creation when unset. A
/// no-op if the account already exists.
pub async fn ensure_admin_user(repository: &dyn UserRepository) -> anyhow::Result<()> {
    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty());

    ensure_admin_user_with(repository, &username, password.as_deref()).await
}

async fn ensure_admin_user_with(
    repository: &dyn UserRepository,
    username: &str,
    password: Option<&str>,
) -> anyhow::Result<()> {
    if repository.find(username).await?.is_some() {
        return Ok(());
    }

    let (password, is_provided) = match password {
        Some(p) => (p.to_string(), true),
        None => (generate_random_password(), false),
    };

    match repository.create(username, &password).await {
        Ok(_) => {}
        // Another caller created the account between our find and create
        Err(DomainError::DuplicateUser { .. }) => return Ok(()),
        Err(e) => return Err(e.into()),
    }

    info!("Initial admin user '{}' created", username);
    if is_provided {
        info!("Password: (set via ADMIN_PASSWORD)");
    } else {
        info!("Password: {}", password);
        info!("Please change this password after first login.");
    }

    Ok(())
}

/// Generate a random password for the initial admin user
fn generate_random_password() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}
