//! In-memory post repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::post::{Comment, LikeToggle, Post, PostFilter, PostId, PostRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of PostRepository
///
/// Every mutation runs under the write lock, which makes `toggle_like` and
/// `push_comment` atomic with respect to concurrent requests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPostRepository {
    posts: Arc<RwLock<HashMap<PostId, Post>>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        let posts = posts.into_iter().map(|p| (*p.id(), p)).collect();

        Self {
            posts: Arc::new(RwLock::new(posts)),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn get(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        let mut posts = self.posts.write().await;

        if posts.contains_key(post.id()) {
            return Err(DomainError::internal(format!(
                "Post with ID '{}' already exists",
                post.id()
            )));
        }

        posts.insert(*post.id(), post.clone());
        Ok(post)
    }

    async fn list(&self, filter: PostFilter, page: PageRequest) -> Result<Page<Post>, DomainError> {
        let posts = self.posts.read().await;

        let mut matching: Vec<&Post> = posts.values().filter(|p| filter.matches(p)).collect();
        matching.sort_by(|a, b| Post::feed_order(a, b));

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .cloned()
            .collect();

        Ok(Page::new(items, total))
    }

    async fn set_content(&self, id: &PostId, content: &str) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.write().await;

        Ok(posts.get_mut(id).map(|post| {
            post.set_content(content);
            post.clone()
        }))
    }

    async fn delete(&self, id: &PostId) -> Result<bool, DomainError> {
        Ok(self.posts.write().await.remove(id).is_some())
    }

    async fn toggle_like(
        &self,
        id: &PostId,
        user: &UserId,
    ) -> Result<Option<LikeToggle>, DomainError> {
        let mut posts = self.posts.write().await;

        Ok(posts.get_mut(id).map(|post| {
            let liked = post.toggle_like(*user);
            LikeToggle {
                post: post.clone(),
                liked,
            }
        }))
    }

    async fn push_comment(
        &self,
        id: &PostId,
        comment: Comment,
    ) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.write().await;

        Ok(posts.get_mut(id).map(|post| {
            post.push_comment(comment);
            post.clone()
        }))
    }
}
