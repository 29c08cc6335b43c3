//! User repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{ProfileUpdate, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their normalized email (for login)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Batch lookup used to resolve references at read time.
    /// Unknown ids are skipped.
    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Create a new user; fails with `DuplicateEmail` if the email is taken
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Atomically overwrite the supplied profile fields, leaving the others
    /// as stored; `None` if the user does not exist
    async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<Option<User>, DomainError>;

    /// Count registered users
    async fn count(&self) -> Result<usize, DomainError>;
}
