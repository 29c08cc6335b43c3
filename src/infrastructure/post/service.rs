//! Post feed service: posts, ownership-gated edits, likes and comments

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::post::{
    normalize_comment_text, normalize_content, Comment, LikeToggle, Post, PostFilter, PostId,
    PostRepository,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Post feed service
///
/// Callers pass author and requester ids taken from an authenticated session;
/// the service does not re-check that those users exist.
#[derive(Debug)]
pub struct PostService<R: PostRepository> {
    repository: Arc<R>,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a post authored by `author`
    pub async fn create_post(&self, author: &UserId, content: &str) -> Result<Post, DomainError> {
        let content = normalize_content(content).map_err(|e| DomainError::validation(e.to_string()))?;

        let post = self.repository.create(Post::new(*author, content)).await?;

        info!(post_id = %post.id(), author_id = %author, "Post created");

        Ok(post)
    }

    /// List every post, newest first
    pub async fn list_feed(&self, page: u32, page_size: u32) -> Result<Page<Post>, DomainError> {
        let request = PageRequest::new(page, page_size)?;
        self.repository.list(PostFilter::All, request).await
    }

    /// List the posts of one author, newest first
    pub async fn list_by_author(
        &self,
        author: &UserId,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Post>, DomainError> {
        let request = PageRequest::new(page, page_size)?;
        self.repository
            .list(PostFilter::Author(*author), request)
            .await
    }

    /// Get a post by ID
    pub async fn get_by_id(&self, id: &PostId) -> Result<Post, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| post_not_found(id))
    }

    /// Replace the content of a post owned by `requester`
    pub async fn update_content(
        &self,
        id: &PostId,
        requester: &UserId,
        content: &str,
    ) -> Result<Post, DomainError> {
        let post = self.get_by_id(id).await?;

        if !post.is_authored_by(requester) {
            return Err(DomainError::unauthorized("Not authorized to update this post"));
        }

        let content = normalize_content(content).map_err(|e| DomainError::validation(e.to_string()))?;

        let post = self
            .repository
            .set_content(id, &content)
            .await?
            .ok_or_else(|| post_not_found(id))?;

        debug!(post_id = %id, "Post content updated");

        Ok(post)
    }

    /// Delete a post owned by `requester`, together with its comments
    pub async fn delete_post(&self, id: &PostId, requester: &UserId) -> Result<(), DomainError> {
        let post = self.get_by_id(id).await?;

        if !post.is_authored_by(requester) {
            return Err(DomainError::unauthorized("Not authorized to delete this post"));
        }

        if !self.repository.delete(id).await? {
            return Err(post_not_found(id));
        }

        info!(post_id = %id, "Post deleted");

        Ok(())
    }

    /// Flip `requester`'s like on a post
    pub async fn toggle_like(
        &self,
        id: &PostId,
        requester: &UserId,
    ) -> Result<LikeToggle, DomainError> {
        let toggle = self
            .repository
            .toggle_like(id, requester)
            .await?
            .ok_or_else(|| post_not_found(id))?;

        debug!(post_id = %id, user_id = %requester, liked = toggle.liked, "Like toggled");

        Ok(toggle)
    }

    /// Append a comment by `requester` to a post
    pub async fn add_comment(
        &self,
        id: &PostId,
        requester: &UserId,
        text: &str,
    ) -> Result<Post, DomainError> {
        let text = normalize_comment_text(text).map_err(|e| DomainError::validation(e.to_string()))?;

        let post = self
            .repository
            .push_comment(id, Comment::new(*requester, text))
            .await?
            .ok_or_else(|| post_not_found(id))?;

        debug!(post_id = %id, user_id = %requester, "Comment added");

        Ok(post)
    }
}

fn post_not_found(id: &PostId) -> DomainError {
    DomainError::not_found(format!("Post '{}' not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::MockPostRepository;
    use crate::infrastructure::post::repository::InMemoryPostRepository;
    use chrono::{Duration, Utc};

    fn create_service() -> PostService<InMemoryPostRepository> {
        PostService::new(Arc::new(InMemoryPostRepository::new()))
    }

    fn service_with(posts: Vec<Post>) -> PostService<InMemoryPostRepository> {
        PostService::new(Arc::new(InMemoryPostRepository::with_posts(posts)))
    }

    #[tokio::test]
    async fn test_create_post_trims_content() {
        let service = create_service();
        let author = UserId::generate();

        let post = service.create_post(&author, "  Hello world \n").await.unwrap();

        assert_eq!(post.content(), "Hello world");
        assert!(post.is_authored_by(&author));
        assert!(post.liked_by().is_empty());
        assert!(post.comments().is_empty());
        assert_eq!(service.get_by_id(post.id()).await.unwrap(), post);
    }

    #[tokio::test]
    async fn test_create_post_rejects_blank_content() {
        let service = create_service();

        let result = service.create_post(&UserId::generate(), "   ").await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(service.list_feed(1, 10).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_list_feed_newest_first() {
        let author = UserId::generate();
        let now = Utc::now();
        let at = |content: &str, seconds_ago: i64| {
            Post::restore(
                PostId::generate(),
                content.to_string(),
                author,
                vec![],
                vec![],
                now - Duration::seconds(seconds_ago),
            )
        };
        let service = service_with(vec![at("t1", 30), at("t2", 20), at("t3", 10)]);

        let page = service.list_feed(1, 10).await.unwrap();

        let contents: Vec<&str> = page.items.iter().map(Post::content).collect();
        assert_eq!(contents, vec!["t3", "t2", "t1"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(10), 1);
    }

    #[tokio::test]
    async fn test_list_feed_rejects_invalid_paging() {
        let service = create_service();

        assert!(matches!(
            service.list_feed(0, 10).await,
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            service.list_by_author(&UserId::generate(), 1, 0).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_by_author() {
        let service = create_service();
        let alice = UserId::generate();
        let bob = UserId::generate();

        service.create_post(&alice, "from alice").await.unwrap();
        service.create_post(&bob, "from bob").await.unwrap();

        let page = service.list_by_author(&alice, 1, 10).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].content(), "from alice");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let service = create_service();

        let result = service.get_by_id(&PostId::generate()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_content_by_author() {
        let service = create_service();
        let author = UserId::generate();
        let post = service.create_post(&author, "Hello").await.unwrap();

        let updated = service
            .update_content(post.id(), &author, " Edited ")
            .await
            .unwrap();

        assert_eq!(updated.content(), "Edited");
        assert_eq!(updated.created_at(), post.created_at());
    }

    #[tokio::test]
    async fn test_update_content_by_non_author_leaves_post_unchanged() {
        let service = create_service();
        let post = service.create_post(&UserId::generate(), "Hello").await.unwrap();

        let result = service
            .update_content(post.id(), &UserId::generate(), "Hijacked")
            .await;

        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
        assert_eq!(service.get_by_id(post.id()).await.unwrap().content(), "Hello");
    }

    #[tokio::test]
    async fn test_update_content_check_order() {
        let service = create_service();
        let author = UserId::generate();
        let post = service.create_post(&author, "Hello").await.unwrap();

        // Missing post wins over blank content
        let result = service
            .update_content(&PostId::generate(), &author, "  ")
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        // Ownership wins over blank content
        let result = service
            .update_content(post.id(), &UserId::generate(), "  ")
            .await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));

        let result = service.update_content(post.id(), &author, "  ").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(service.get_by_id(post.id()).await.unwrap().content(), "Hello");
    }

    #[tokio::test]
    async fn test_delete_post_as_non_author() {
        let service = create_service();
        let post = service.create_post(&UserId::generate(), "Hello").await.unwrap();

        let result = service.delete_post(post.id(), &UserId::generate()).await;

        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
        assert!(service.get_by_id(post.id()).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_post_removes_comments() {
        let service = create_service();
        let author = UserId::generate();
        let post = service.create_post(&author, "Hello").await.unwrap();
        service
            .add_comment(post.id(), &UserId::generate(), "nice")
            .await
            .unwrap();

        service.delete_post(post.id(), &author).await.unwrap();

        assert!(matches!(
            service.get_by_id(post.id()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete_post(post.id(), &author).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_like_scenario() {
        let service = create_service();
        let alice = UserId::generate();
        let bob = UserId::generate();
        let post = service.create_post(&alice, "Hello world").await.unwrap();

        let first = service.toggle_like(post.id(), &bob).await.unwrap();
        assert!(first.liked);
        assert_eq!(first.post.liked_by(), &[bob]);

        let second = service.toggle_like(post.id(), &bob).await.unwrap();
        assert!(!second.liked);
        assert!(second.post.liked_by().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_like_missing_post() {
        let service = create_service();

        let result = service
            .toggle_like(&PostId::generate(), &UserId::generate())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_add_comment_appends() {
        let service = create_service();
        let post = service.create_post(&UserId::generate(), "Hello").await.unwrap();
        let commenter = UserId::generate();

        service.add_comment(post.id(), &commenter, "first").await.unwrap();
        let post = service
            .add_comment(post.id(), &commenter, "  second ")
            .await
            .unwrap();

        let texts: Vec<&str> = post.comments().iter().map(Comment::text).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(post.comments()[1].author_id(), &commenter);
    }

    #[tokio::test]
    async fn test_add_comment_rejects_whitespace() {
        let service = create_service();
        let post = service.create_post(&UserId::generate(), "Hello").await.unwrap();

        let result = service
            .add_comment(post.id(), &UserId::generate(), "  ")
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert!(service
            .get_by_id(post.id())
            .await
            .unwrap()
            .comments()
            .is_empty());
    }

    #[tokio::test]
    async fn test_add_comment_missing_post() {
        let service = create_service();

        let result = service
            .add_comment(&PostId::generate(), &UserId::generate(), "hi")
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut repository = MockPostRepository::new();
        repository
            .expect_toggle_like()
            .returning(|_, _| Err(DomainError::storage("connection reset")));

        let service = PostService::new(Arc::new(repository));

        let result = service
            .toggle_like(&PostId::generate(), &UserId::generate())
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
