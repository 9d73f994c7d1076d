//! User domain
//!
//! This module provides domain types and traits for the credential store:
//! the user record and its public projection, input validation, and the
//! repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{PublicUser, User};
pub use repository::UserRepository;
pub use validation::{validate_password, validate_username, UserValidationError};
