//! Post entity, embedded comments and like set

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Opaque post identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(id: &str) -> Option<Self> {
        Uuid::parse_str(id.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for PostId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Comment embedded in a post; immutable once appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    author_id: UserId,
    text: String,
    created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author_id: UserId, text: impl Into<String>) -> Self {
        Self {
            author_id,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Short text update authored by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    content: String,
    author_id: UserId,
    /// Users who liked the post, in like order, each at most once
    liked_by: Vec<UserId>,
    /// Oldest first
    comments: Vec<Comment>,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with no likes and no comments
    pub fn new(author_id: UserId, content: impl Into<String>) -> Self {
        Self {
            id: PostId::generate(),
            content: content.into(),
            author_id,
            liked_by: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild a post from persisted fields
    pub fn restore(
        id: PostId,
        content: String,
        author_id: UserId,
        liked_by: Vec<UserId>,
        comments: Vec<Comment>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut unique: Vec<UserId> = Vec::with_capacity(liked_by.len());

        for user in liked_by {
            if !unique.contains(&user) {
                unique.push(user);
            }
        }

        Self {
            id,
            content,
            author_id,
            liked_by: unique,
            comments,
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> &PostId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn liked_by(&self) -> &[UserId] {
        &self.liked_by
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        self.author_id == *user
    }

    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.liked_by.contains(user)
    }

    // Mutators

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Flip `user`'s membership in the like set; returns whether the post is
    /// now liked by them
    pub fn toggle_like(&mut self, user: UserId) -> bool {
        if let Some(index) = self.liked_by.iter().position(|u| *u == user) {
            self.liked_by.remove(index);
            false
        } else {
            self.liked_by.push(user);
            true
        }
    }

    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Feed order: newest first, ties broken by ascending id
    pub fn feed_order(a: &Post, b: &Post) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_post_creation() {
        let author = UserId::generate();
        let post = Post::new(author, "Hello world");

        assert_eq!(post.content(), "Hello world");
        assert!(post.is_authored_by(&author));
        assert!(post.liked_by().is_empty());
        assert!(post.comments().is_empty());
    }

    #[test]
    fn test_toggle_like_is_an_idempotent_pair() {
        let mut post = Post::new(UserId::generate(), "Hello");
        let liker = UserId::generate();

        assert!(post.toggle_like(liker));
        assert_eq!(post.liked_by(), &[liker]);

        assert!(!post.toggle_like(liker));
        assert!(post.liked_by().is_empty());
    }

    #[test]
    fn test_author_may_like_own_post() {
        let author = UserId::generate();
        let mut post = Post::new(author, "Hello");

        assert!(post.toggle_like(author));
        assert!(post.is_liked_by(&author));
    }

    #[test]
    fn test_comments_keep_insertion_order() {
        let mut post = Post::new(UserId::generate(), "Hello");
        let commenter = UserId::generate();

        post.push_comment(Comment::new(commenter, "first"));
        post.push_comment(Comment::new(commenter, "second"));

        let texts: Vec<&str> = post.comments().iter().map(Comment::text).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_restore_drops_duplicate_likes() {
        let liker = UserId::generate();
        let post = Post::restore(
            PostId::generate(),
            "Hello".to_string(),
            UserId::generate(),
            vec![liker, liker],
            vec![],
            Utc::now(),
        );

        assert_eq!(post.liked_by(), &[liker]);
    }

    #[test]
    fn test_feed_order_newest_first_then_id() {
        let author = UserId::generate();
        let now = Utc::now();
        let older = Post::restore(
            PostId::generate(),
            "older".to_string(),
            author,
            vec![],
            vec![],
            now - Duration::seconds(10),
        );
        let newer = Post::restore(
            PostId::generate(),
            "newer".to_string(),
            author,
            vec![],
            vec![],
            now,
        );

        assert_eq!(Post::feed_order(&newer, &older), Ordering::Less);
        assert_eq!(Post::feed_order(&older, &newer), Ordering::Greater);

        let low = Post::restore(
            PostId::from(Uuid::from_u128(1)),
            "a".to_string(),
            author,
            vec![],
            vec![],
            now,
        );
        let high = Post::restore(
            PostId::from(Uuid::from_u128(2)),
            "b".to_string(),
            author,
            vec![],
            vec![],
            now,
        );

        assert_eq!(Post::feed_order(&low, &high), Ordering::Less);
    }

    #[test]
    fn test_post_id_parse() {
        let id = PostId::generate();
        assert_eq!(PostId::parse(&id.to_string()), Some(id));
        assert_eq!(PostId::parse("nope"), None);
    }
}
