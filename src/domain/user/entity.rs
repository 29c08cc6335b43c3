//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::UserValidationError;

/// Opaque user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.trim())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId(id.to_string()))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields a user may change on their own profile
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.bio.is_none() && self.profile_picture_url.is_none()
    }
}

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: String,
    /// Normalized (lowercased) login email
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_picture_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a freshly generated id
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        bio: Option<String>,
    ) -> Self {
        Self {
            id: UserId::generate(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            bio: bio.unwrap_or_default(),
            profile_picture_url: None,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a user from persisted fields
    pub fn restore(
        id: UserId,
        name: String,
        email: String,
        password_hash: String,
        bio: String,
        profile_picture_url: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            bio,
            profile_picture_url,
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn bio(&self) -> &str {
        &self.bio
    }

    pub fn profile_picture_url(&self) -> Option<&str> {
        self.profile_picture_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Mutators

    /// Apply a profile update; email and password are never touched here
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }

        if let Some(bio) = update.bio {
            self.bio = bio;
        }

        if let Some(url) = update.profile_picture_url {
            self.profile_picture_url = Some(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new("Alice", "a@x.com", "hashed_password", None)
    }

    #[test]
    fn test_user_id_round_trip_through_string() {
        let id = UserId::generate();
        let parsed = UserId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_user_id_invalid() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_user_creation_defaults() {
        let user = create_test_user();

        assert_eq!(user.name(), "Alice");
        assert_eq!(user.email(), "a@x.com");
        assert_eq!(user.bio(), "");
        assert!(user.profile_picture_url().is_none());
    }

    #[test]
    fn test_user_creation_with_bio() {
        let user = User::new("Bob", "b@x.com", "hash", Some("Hi there".to_string()));
        assert_eq!(user.bio(), "Hi there");
    }

    #[test]
    fn test_apply_profile_changes_only_supplied_fields() {
        let mut user = create_test_user();
        let created_at = user.created_at();

        user.apply_profile(ProfileUpdate {
            bio: Some("Rustacean".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name(), "Alice");
        assert_eq!(user.bio(), "Rustacean");
        assert_eq!(user.email(), "a@x.com");
        assert_eq!(user.password_hash(), "hashed_password");
        assert_eq!(user.created_at(), created_at);

        user.apply_profile(ProfileUpdate {
            name: Some("Alice B.".to_string()),
            profile_picture_url: Some("https://img/a.png".to_string()),
            ..Default::default()
        });

        assert_eq!(user.name(), "Alice B.");
        assert_eq!(user.bio(), "Rustacean");
        assert_eq!(user.profile_picture_url(), Some("https://img/a.png"));
    }

    #[test]
    fn test_user_serialization_excludes_password() {
        let user = create_test_user();

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("\"createdAt\""));
    }

    #[test]
    fn test_profile_update_is_empty() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(!ProfileUpdate {
            bio: Some(String::new()),
            ..Default::default()
        }
        .is_empty());
    }
}
