//! Post feed endpoints
//!
//! Responses resolve author, liker and commenter ids into user summaries with
//! one batch lookup per response.

use std::collections::{BTreeSet, HashMap};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::domain::pagination::Page;
use crate::domain::post::{Post, PostId};
use crate::domain::user::{User, UserId};

/// Create the posts router
pub fn create_posts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_feed).post(create_post))
        .route("/user/{user_id}", get(list_by_author))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/comment", post(add_comment))
}

/// `?page=&limit=` query
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: String,
}

/// User reference resolved for display
///
/// Fields other than `id` are absent when the user no longer resolves.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub user: UserSummary,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: PostId,
    pub content: String,
    pub author: UserSummary,
    pub likes: Vec<UserSummary>,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub current_page: u32,
    pub total_pages: usize,
    pub total_posts: usize,
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub message: &'static str,
    pub post: PostResponse,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub message: &'static str,
    pub post: PostResponse,
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Users referenced by a set of posts, keyed by id
struct UserLookup(HashMap<UserId, User>);

impl UserLookup {
    async fn for_posts(state: &AppState, posts: &[Post]) -> Result<Self, ApiError> {
        let ids: BTreeSet<UserId> = posts
            .iter()
            .flat_map(|post| {
                std::iter::once(*post.author_id())
                    .chain(post.liked_by().iter().copied())
                    .chain(post.comments().iter().map(|c| *c.author_id()))
            })
            .collect();

        let ids: Vec<UserId> = ids.into_iter().collect();
        let users = state.user_service.get_many(&ids).await?;

        Ok(Self(users.into_iter().map(|u| (*u.id(), u)).collect()))
    }

    fn author(&self, id: &UserId) -> UserSummary {
        let user = self.0.get(id);
        UserSummary {
            id: *id,
            name: user.map(|u| u.name().to_string()),
            email: user.map(|u| u.email().to_string()),
            profile_picture_url: user.and_then(|u| u.profile_picture_url()).map(str::to_string),
        }
    }

    fn liker(&self, id: &UserId) -> UserSummary {
        UserSummary {
            id: *id,
            name: self.0.get(id).map(|u| u.name().to_string()),
            email: None,
            profile_picture_url: None,
        }
    }

    fn commenter(&self, id: &UserId) -> UserSummary {
        let user = self.0.get(id);
        UserSummary {
            id: *id,
            name: user.map(|u| u.name().to_string()),
            email: None,
            profile_picture_url: user.and_then(|u| u.profile_picture_url()).map(str::to_string),
        }
    }

    fn present(&self, post: Post) -> PostResponse {
        PostResponse {
            id: *post.id(),
            content: post.content().to_string(),
            author: self.author(post.author_id()),
            likes: post.liked_by().iter().map(|id| self.liker(id)).collect(),
            comments: post
                .comments()
                .iter()
                .map(|c| CommentResponse {
                    user: self.commenter(c.author_id()),
                    text: c.text().to_string(),
                    created_at: c.created_at(),
                })
                .collect(),
            created_at: post.created_at(),
        }
    }
}

async fn present_post(state: &AppState, post: Post) -> Result<PostResponse, ApiError> {
    let lookup = UserLookup::for_posts(state, std::slice::from_ref(&post)).await?;
    Ok(lookup.present(post))
}

async fn present_page(
    state: &AppState,
    page: Page<Post>,
    current_page: u32,
    page_size: u32,
) -> Result<PostListResponse, ApiError> {
    let lookup = UserLookup::for_posts(state, &page.items).await?;
    let total_pages = page.total_pages(page_size);
    let total_posts = page.total;

    Ok(PostListResponse {
        posts: page.items.into_iter().map(|p| lookup.present(p)).collect(),
        current_page,
        total_pages,
        total_posts,
    })
}

fn parse_post_id(id: &str) -> Result<PostId, ApiError> {
    PostId::parse(id).ok_or_else(|| ApiError::not_found("Post not found"))
}

impl PageQuery {
    fn resolve(&self, state: &AppState) -> (u32, u32) {
        (
            self.page.unwrap_or(1),
            self.limit.unwrap_or(state.default_page_size),
        )
    }
}

/// Global feed, newest first
///
/// GET /api/posts?page=&limit=
pub async fn list_feed(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let (page, limit) = query.resolve(&state);
    let posts = state.post_service.list_feed(page, limit).await?;

    Ok(Json(present_page(&state, posts, page, limit).await?))
}

/// Posts of one author, newest first
///
/// GET /api/posts/user/{user_id}?page=&limit=
pub async fn list_by_author(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let author = UserId::parse(&user_id).map_err(|_| ApiError::not_found("User not found"))?;
    let (page, limit) = query.resolve(&state);
    let posts = state.post_service.list_by_author(&author, page, limit).await?;

    Ok(Json(present_page(&state, posts, page, limit).await?))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.post_service.get_by_id(&parse_post_id(&id)?).await?;

    Ok(Json(present_post(&state, post).await?))
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<ContentRequest>,
) -> Result<(StatusCode, Json<PostMessageResponse>), ApiError> {
    let post = state
        .post_service
        .create_post(user.id(), &request.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostMessageResponse {
            message: "Post created successfully",
            post: present_post(&state, post).await?,
        }),
    ))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(request): Json<ContentRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    let post = state
        .post_service
        .update_content(&parse_post_id(&id)?, user.id(), &request.content)
        .await?;

    Ok(Json(PostMessageResponse {
        message: "Post updated successfully",
        post: present_post(&state, post).await?,
    }))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .post_service
        .delete_post(&parse_post_id(&id)?, user.id())
        .await?;

    Ok(Json(MessageResponse {
        message: "Post deleted successfully",
    }))
}

/// POST /api/posts/{id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, ApiError> {
    let toggle = state
        .post_service
        .toggle_like(&parse_post_id(&id)?, user.id())
        .await?;

    Ok(Json(LikeResponse {
        message: if toggle.liked { "Post liked" } else { "Post unliked" },
        post: present_post(&state, toggle.post).await?,
        liked: toggle.liked,
    }))
}

/// POST /api/posts/{id}/comment
pub async fn add_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    let post = state
        .post_service
        .add_comment(&parse_post_id(&id)?, user.id(), &request.text)
        .await?;

    Ok(Json(PostMessageResponse {
        message: "Comment added successfully",
        post: present_post(&state, post).await?,
    }))
}
