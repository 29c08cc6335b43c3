//! User domain
//!
//! Domain types and traits for user identity and profiles: the user entity,
//! input validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{ProfileUpdate, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_name, validate_password, UserValidationError,
    DEFAULT_MIN_PASSWORD_LENGTH,
};

#[cfg(test)]
pub use repository::MockUserRepository;
