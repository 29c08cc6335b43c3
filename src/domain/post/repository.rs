//! Post repository trait
//!
//! Like toggles and comment appends are exposed as single atomic operations so
//! that concurrent requests on the same post cannot lose updates. Backends must
//! implement them without a separate read round trip.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{Comment, Post, PostId};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Which posts a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Author(UserId),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::All => true,
            Self::Author(author) => post.is_authored_by(author),
        }
    }
}

/// Result of an atomic like toggle
#[derive(Debug, Clone, PartialEq)]
pub struct LikeToggle {
    pub post: Post,
    /// Whether the requester likes the post after the toggle
    pub liked: bool,
}

/// Repository for post persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by ID
    async fn get(&self, id: &PostId) -> Result<Option<Post>, DomainError>;

    /// Store a new post
    async fn create(&self, post: Post) -> Result<Post, DomainError>;

    /// One page of posts in feed order (newest first, ties by ascending id)
    async fn list(&self, filter: PostFilter, page: PageRequest) -> Result<Page<Post>, DomainError>;

    /// Replace the content of a post; `None` if it no longer exists
    async fn set_content(&self, id: &PostId, content: &str) -> Result<Option<Post>, DomainError>;

    /// Delete a post with its embedded comments; returns true if deleted
    async fn delete(&self, id: &PostId) -> Result<bool, DomainError>;

    /// Atomically add or remove `user` from the like set
    async fn toggle_like(
        &self,
        id: &PostId,
        user: &UserId,
    ) -> Result<Option<LikeToggle>, DomainError>;

    /// Atomically append a comment
    async fn push_comment(&self, id: &PostId, comment: Comment)
        -> Result<Option<Post>, DomainError>;
}
