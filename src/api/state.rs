//! Application state for shared services

use std::sync::Arc;

use crate::domain::pagination::Page;
use crate::domain::post::{LikeToggle, Post, PostId, PostRepository};
use crate::domain::user::{ProfileUpdate, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::post::PostService;
use crate::infrastructure::user::{PasswordHasher, RegisterUserRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub post_service: Arc<dyn PostServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    /// Page size applied when a listing omits `limit`
    pub default_page_size: u32,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        post_service: Arc<dyn PostServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            post_service,
            jwt_service,
            default_page_size: 10,
        }
    }

    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }
}

/// Trait for user directory operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError>;
    async fn authenticate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserId, DomainError>;
    async fn get_by_id(&self, id: &UserId) -> Result<User, DomainError>;
    /// Batch lookup backing the read-time join; unknown ids are skipped
    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;
    async fn update_profile(&self, id: &UserId, update: ProfileUpdate)
        -> Result<User, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for post feed operations
#[async_trait::async_trait]
pub trait PostServiceTrait: Send + Sync {
    async fn create_post(&self, author: &UserId, content: &str) -> Result<Post, DomainError>;
    async fn list_feed(&self, page: u32, page_size: u32) -> Result<Page<Post>, DomainError>;
    async fn list_by_author(
        &self,
        author: &UserId,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Post>, DomainError>;
    async fn get_by_id(&self, id: &PostId) -> Result<Post, DomainError>;
    async fn update_content(
        &self,
        id: &PostId,
        requester: &UserId,
        content: &str,
    ) -> Result<Post, DomainError>;
    async fn delete_post(&self, id: &PostId, requester: &UserId) -> Result<(), DomainError>;
    async fn toggle_like(&self, id: &PostId, requester: &UserId)
        -> Result<LikeToggle, DomainError>;
    async fn add_comment(
        &self,
        id: &PostId,
        requester: &UserId,
        text: &str,
    ) -> Result<Post, DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn authenticate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserId, DomainError> {
        UserService::authenticate_credentials(self, email, password).await
    }

    async fn get_by_id(&self, id: &UserId) -> Result<User, DomainError> {
        UserService::get_by_id(self, id).await
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        UserService::get_many(self, ids).await
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        UserService::update_profile(self, id, update).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl<R: PostRepository + 'static> PostServiceTrait for PostService<R> {
    async fn create_post(&self, author: &UserId, content: &str) -> Result<Post, DomainError> {
        PostService::create_post(self, author, content).await
    }

    async fn list_feed(&self, page: u32, page_size: u32) -> Result<Page<Post>, DomainError> {
        PostService::list_feed(self, page, page_size).await
    }

    async fn list_by_author(
        &self,
        author: &UserId,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Post>, DomainError> {
        PostService::list_by_author(self, author, page, page_size).await
    }

    async fn get_by_id(&self, id: &PostId) -> Result<Post, DomainError> {
        PostService::get_by_id(self, id).await
    }

    async fn update_content(
        &self,
        id: &PostId,
        requester: &UserId,
        content: &str,
    ) -> Result<Post, DomainError> {
        PostService::update_content(self, id, requester, content).await
    }

    async fn delete_post(&self, id: &PostId, requester: &UserId) -> Result<(), DomainError> {
        PostService::delete_post(self, id, requester).await
    }

    async fn toggle_like(
        &self,
        id: &PostId,
        requester: &UserId,
    ) -> Result<LikeToggle, DomainError> {
        PostService::toggle_like(self, id, requester).await
    }

    async fn add_comment(
        &self,
        id: &PostId,
        requester: &UserId,
        text: &str,
    ) -> Result<Post, DomainError> {
        PostService::add_comment(self, id, requester, text).await
    }
}
