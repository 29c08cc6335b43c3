//! PostgreSQL post repository implementation
//!
//! Posts are stored one row per post with the like set as a `UUID[]` column
//! and the comments as a `JSONB` array. Likes and comments are mutated with
//! single `UPDATE ... RETURNING` statements so the row lock covers the whole
//! toggle or append.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::pagination::{Page, PageRequest};
use crate::domain::post::{Comment, LikeToggle, Post, PostFilter, PostId, PostRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

const POST_COLUMNS: &str = "id, author_id, content, liked_by, comments, created_at";

/// PostgreSQL implementation of PostRepository
#[derive(Debug, Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn author_param(filter: PostFilter) -> Option<Uuid> {
    match filter {
        PostFilter::All => None,
        PostFilter::Author(author) => Some(author.as_uuid()),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn get(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get post: {}", e)))?;

        row.as_ref().map(row_to_post).transpose()
    }

    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        let liked_by: Vec<Uuid> = post.liked_by().iter().map(UserId::as_uuid).collect();

        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, content, liked_by, comments, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.author_id().as_uuid())
        .bind(post.content())
        .bind(&liked_by)
        .bind(Json(post.comments()))
        .bind(post.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create post: {}", e)))?;

        Ok(post)
    }

    async fn list(&self, filter: PostFilter, page: PageRequest) -> Result<Page<Post>, DomainError> {
        let author = author_param(filter);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts WHERE ($1::uuid IS NULL OR author_id = $1)",
        )
        .bind(author)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count posts: {}", e)))?;

        let Some(offset) = offset_param(page) else {
            return Ok(Page::new(Vec::new(), total as usize));
        };

        let rows = sqlx::query(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE ($1::uuid IS NULL OR author_id = $1)
            ORDER BY created_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(author)
        .bind(page.limit() as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list posts: {}", e)))?;

        let items = rows.iter().map(row_to_post).collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total as usize))
    }

    async fn set_content(&self, id: &PostId, content: &str) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET content = $2 WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update post: {}", e)))?;

        row.as_ref().map(row_to_post).transpose()
    }

    async fn delete(&self, id: &PostId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete post: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_like(
        &self,
        id: &PostId,
        user: &UserId,
    ) -> Result<Option<LikeToggle>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE posts
            SET liked_by = CASE
                WHEN $2 = ANY(liked_by) THEN array_remove(liked_by, $2)
                ELSE array_append(liked_by, $2)
            END
            WHERE id = $1
            RETURNING {POST_COLUMNS}, ($2 = ANY(liked_by)) AS liked
            "#
        ))
        .bind(id.as_uuid())
        .bind(user.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to toggle like: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let liked: bool = row
            .try_get("liked")
            .map_err(|e| DomainError::storage(format!("Failed to decode like flag: {}", e)))?;

        Ok(Some(LikeToggle {
            post: row_to_post(&row)?,
            liked,
        }))
    }

    async fn push_comment(
        &self,
        id: &PostId,
        comment: Comment,
    ) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET comments = comments || $2 WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(Json(vec![comment]))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to add comment: {}", e)))?;

        row.as_ref().map(row_to_post).transpose()
    }
}

fn row_to_post(row: &PgRow) -> Result<Post, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Failed to decode post row: {}", e));

    let id: Uuid = row.try_get("id").map_err(map_err)?;
    let author_id: Uuid = row.try_get("author_id").map_err(map_err)?;
    let liked_by: Vec<Uuid> = row.try_get("liked_by").map_err(map_err)?;
    let Json(comments): Json<Vec<Comment>> = row.try_get("comments").map_err(map_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_err)?;

    Ok(Post::restore(
        PostId::from(id),
        row.try_get("content").map_err(map_err)?,
        UserId::from(author_id),
        liked_by.into_iter().map(UserId::from).collect(),
        comments,
        created_at,
    ))
}

/// OFFSET bind value; `None` when the page starts beyond what Postgres accepts
fn offset_param(page: PageRequest) -> Option<i64> {
    i64::try_from(page.offset()).ok()
}
