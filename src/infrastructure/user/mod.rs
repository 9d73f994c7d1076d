//! User infrastructure
//!
//! This module provides the file-backed credential repository and password
//! hashing with Argon2.

mod password;
mod repository;

pub use password::{Argon2Hasher, PasswordHasher};
pub use repository::FileUserRepository;
