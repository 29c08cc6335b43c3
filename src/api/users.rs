//! User directory endpoints
//!
//! Registration and login return a session token; profile routes require one.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::{ProfileUpdate, User, UserId};
use crate::infrastructure::user::RegisterUserRequest;

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile/me", get(get_current_user))
        .route("/profile/update", put(update_profile))
        .route("/{id}", get(get_user))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub bio: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Profile update request; omitted fields keep their value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// User response (never includes the password hash)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            bio: user.bio().to_string(),
            profile_picture_url: user.profile_picture_url().map(str::to_string),
            created_at: user.created_at(),
        }
    }
}

/// Token plus the user it was issued for
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

fn issue_token(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    let token = state.jwt_service.generate(user)?;
    let expires_at = Utc::now() + Duration::hours(state.jwt_service.expiration_hours() as i64);

    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
        expires_at,
    })
}

/// Register a new user
///
/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            name: request.name,
            email: request.email,
            password: request.password,
            bio: request.bio,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(issue_token(&state, &user)?)))
}

/// Log in with email and password
///
/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user_id = state
        .user_service
        .authenticate_credentials(&request.email, &request.password)
        .await?;

    let user = state.user_service.get_by_id(&user_id).await?;

    info!(user_id = %user_id, "User logged in");

    Ok(Json(issue_token(&state, &user)?))
}

/// Public profile of any user
///
/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = UserId::parse(&id).map_err(|_| ApiError::not_found("User not found"))?;
    let user = state.user_service.get_by_id(&id).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// Profile of the authenticated user
///
/// GET /api/users/profile/me
pub async fn get_current_user(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// Update name, bio or profile picture of the authenticated user
///
/// PUT /api/users/profile/update
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    let user = state
        .user_service
        .update_profile(
            user.id(),
            ProfileUpdate {
                name: request.name,
                bio: request.bio,
                profile_picture_url: request.profile_picture_url,
            },
        )
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully",
        user: UserResponse::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::api::test_support::TestApp;

    #[tokio::test]
    async fn test_register_returns_token_and_user() {
        let app = TestApp::new();

        let (status, body) = app
            .request(
                Method::POST,
                "/api/users/register",
                None,
                Some(json!({"name": "Alice", "email": "a@x.com", "password": "secret123"})),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["name"], "Alice");
        assert_eq!(body["user"]["email"], "a@x.com");
        assert_eq!(body["user"]["bio"], "");
        assert!(body["user"].get("passwordHash").is_none());
        assert!(body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let app = TestApp::new();
        app.register("Alice", "a@x.com").await;

        let (status, body) = app
            .request(
                Method::POST,
                "/api/users/register",
                None,
                Some(json!({"name": "Eve", "email": "a@x.com", "password": "secret123"})),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "duplicate_email");
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let app = TestApp::new();

        let (status, body) = app
            .request(
                Method::POST,
                "/api/users/register",
                None,
                Some(json!({"email": "a@x.com"})),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");
    }

    #[tokio::test]
    async fn test_login() {
        let app = TestApp::new();
        let registered = app.register("Alice", "a@x.com").await;

        let (status, body) = app
            .request(
                Method::POST,
                "/api/users/login",
                None,
                Some(json!({"email": "a@x.com", "password": "secret123"})),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], registered.id);
        assert!(body["token"].is_string());
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let app = TestApp::new();
        app.register("Alice", "a@x.com").await;

        let (wrong_status, wrong_body) = app
            .request(
                Method::POST,
                "/api/users/login",
                None,
                Some(json!({"email": "a@x.com", "password": "nope-nope"})),
            )
            .await;
        let (unknown_status, unknown_body) = app
            .request(
                Method::POST,
                "/api/users/login",
                None,
                Some(json!({"email": "who@x.com", "password": "secret123"})),
            )
            .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body, unknown_body);
    }

    #[tokio::test]
    async fn test_get_user() {
        let app = TestApp::new();
        let alice = app.register("Alice", "a@x.com").await;

        let (status, body) = app
            .request(Method::GET, &format!("/api/users/{}", alice.id), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Alice");

        let (status, _) = app
            .request(Method::GET, "/api/users/not-a-uuid", None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .request(
                Method::GET,
                "/api/users/00000000-0000-0000-0000-000000000000",
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let app = TestApp::new();

        let (status, body) = app
            .request(Method::GET, "/api/users/profile/me", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthenticated");

        let (status, _) = app
            .request(Method::GET, "/api/users/profile/me", Some("garbage"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_me_and_update() {
        let app = TestApp::new();
        let alice = app.register("Alice", "a@x.com").await;

        let (status, body) = app
            .request(Method::GET, "/api/users/profile/me", Some(&alice.token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], alice.id);

        let (status, body) = app
            .request(
                Method::PUT,
                "/api/users/profile/update",
                Some(&alice.token),
                Some(json!({"bio": "Rustacean", "profilePictureUrl": "https://img/a.png"})),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Profile updated successfully");
        assert_eq!(body["user"]["name"], "Alice");
        assert_eq!(body["user"]["bio"], "Rustacean");
        assert_eq!(body["user"]["profilePictureUrl"], "https://img/a.png");
        assert_eq!(body["user"]["email"], "a@x.com");
    }
}
