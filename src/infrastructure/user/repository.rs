//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{ProfileUpdate, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    /// Normalized email -> user ID
    email_index: HashMap<String, UserId>,
}

/// In-memory implementation of UserRepository
///
/// Both maps live behind one lock so the email uniqueness check and the
/// insert happen atomically.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let mut table = UserTable::default();

        for user in users {
            table.email_index.insert(user.email().to_string(), *user.id());
            table.users.insert(*user.id(), user);
        }

        Self {
            table: Arc::new(RwLock::new(table)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .email_index
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().await;
        Ok(ids.iter().filter_map(|id| table.users.get(id)).cloned().collect())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if table.email_index.contains_key(user.email()) {
            return Err(DomainError::duplicate_email(user.email()));
        }

        if table.users.contains_key(user.id()) {
            return Err(DomainError::internal(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        table.email_index.insert(user.email().to_string(), *user.id());
        table.users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<Option<User>, DomainError> {
        let mut table = self.table.write().await;

        // Email is immutable after registration, so the index stays valid
        Ok(table.users.get_mut(id).map(|stored| {
            stored.apply_profile(update);
            stored.clone()
        }))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.table.read().await.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(name: &str, email: &str) -> User {
        User::new(name, email, "hashed_password", None)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Alice", "a@x.com");

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.name(), "Alice");
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Alice", "a@x.com");

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(retrieved.id(), user.id());

        assert!(repo.get_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("Alice", "a@x.com")).await.unwrap();

        let result = repo.create(create_test_user("Other", "a@x.com")).await;
        assert!(matches!(result, Err(DomainError::DuplicateEmail { .. })));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_many_skips_unknown() {
        let alice = create_test_user("Alice", "a@x.com");
        let bob = create_test_user("Bob", "b@x.com");
        let repo = InMemoryUserRepository::with_users(vec![alice.clone(), bob.clone()]);

        let found = repo
            .get_many(&[*bob.id(), UserId::generate(), *alice.id()])
            .await
            .unwrap();

        let names: Vec<&str> = found.iter().map(User::name).collect();
        assert_eq!(names, vec!["Bob", "Alice"]);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Alice", "a@x.com");

        repo.create(user.clone()).await.unwrap();

        let updated = repo
            .update_profile(
                user.id(),
                ProfileUpdate {
                    bio: Some("hello".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.bio(), "hello");
        assert_eq!(updated.name(), "Alice");

        let retrieved = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(retrieved.bio(), "hello");
    }

    #[tokio::test]
    async fn test_update_profile_missing_user() {
        let repo = InMemoryUserRepository::new();

        let result = repo
            .update_profile(&UserId::generate(), ProfileUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_profile_updates_keep_both_fields() {
        let user = create_test_user("Alice", "a@x.com");
        let repo = InMemoryUserRepository::with_users(vec![user.clone()]);
        let id = *user.id();

        let rename = {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.update_profile(
                    &id,
                    ProfileUpdate {
                        name: Some("Alicia".to_string()),
                        ..Default::default()
                    },
                )
                .await
            })
        };
        let rebio = {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.update_profile(
                    &id,
                    ProfileUpdate {
                        bio: Some("hello".to_string()),
                        ..Default::default()
                    },
                )
                .await
            })
        };

        rename.await.unwrap().unwrap();
        rebio.await.unwrap().unwrap();

        let stored = repo.get(&id).await.unwrap().unwrap();
        assert_eq!((stored.name(), stored.bio()), ("Alicia", "hello"));
    }
}
