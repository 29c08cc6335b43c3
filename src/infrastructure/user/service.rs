//! User directory service: registration, credential checks and profiles

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::user::{
    validate_email, validate_name, validate_password, ProfileUpdate, User, UserId,
    UserRepository, DEFAULT_MIN_PASSWORD_LENGTH,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
}

/// User directory service
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    min_password_length: usize,
    /// Hash checked against when an email is unknown, so both login failure
    /// paths cost the same
    decoy_hash: OnceCell<String>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service with the default password policy
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            repository,
            hasher,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Override the minimum password length
    pub fn with_min_password_length(mut self, min_length: usize) -> Self {
        self.min_password_length = min_length;
        self
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        let name = validate_name(&request.name).map_err(|e| DomainError::validation(e.to_string()))?;
        let email =
            validate_email(&request.email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password, self.min_password_length)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.get_by_email(&email).await?.is_some() {
            return Err(DomainError::duplicate_email(email));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let bio = request.bio.map(|b| b.trim().to_string());

        let user = self
            .repository
            .create(User::new(name, email, password_hash, bio))
            .await?;

        info!(user_id = %user.id(), "User registered");

        Ok(user)
    }

    /// Check an email/password pair and return the matching user ID
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn authenticate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserId, DomainError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.repository.get_by_email(&email).await? else {
            let decoy = self.decoy_hash()?;
            let _ = self.hasher.verify(password, decoy);
            debug!("Login attempt for unknown email");
            return Err(DomainError::InvalidCredentials);
        };

        if !self.hasher.verify(password, user.password_hash()) {
            debug!(user_id = %user.id(), "Login attempt with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(*user.id())
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: &UserId) -> Result<User, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    /// Resolve many users at once; unknown ids are skipped
    pub async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        self.repository.get_many(ids).await
    }

    /// Update name, bio and/or profile picture of a user
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let update = normalize_profile_update(update)?;

        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let user = self
            .repository
            .update_profile(id, update)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;
        debug!(user_id = %id, "Profile updated");

        Ok(user)
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    fn decoy_hash(&self) -> Result<&String, DomainError> {
        self.decoy_hash
            .get_or_try_init(|| self.hasher.hash("decoy-password-for-timing"))
    }
}

fn normalize_profile_update(update: ProfileUpdate) -> Result<ProfileUpdate, DomainError> {
    let name = update
        .name
        .map(|n| validate_name(&n))
        .transpose()
        .map_err(|e| DomainError::validation(e.to_string()))?;

    Ok(ProfileUpdate {
        name,
        bio: update.bio.map(|b| b.trim().to_string()),
        profile_picture_url: update.profile_picture_url.map(|u| u.trim().to_string()),
    })
}
