//! In-process harness for router tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::api::router::create_router_with_state;
use crate::api::state::AppState;
use crate::domain::post::MockPostRepository;
use crate::domain::DomainError;
use crate::infrastructure::auth::{JwtConfig, JwtService};
use crate::infrastructure::post::{InMemoryPostRepository, PostService};
use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

pub struct TestUser {
    pub id: String,
    pub token: String,
}

pub struct TestApp {
    router: Router,
}

fn user_service() -> Arc<UserService<InMemoryUserRepository, Argon2Hasher>> {
    Arc::new(UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2Hasher::new()),
    ))
}

fn jwt_service() -> Arc<JwtService> {
    Arc::new(JwtService::new(JwtConfig::new("router-test-secret", 1)))
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(
            user_service(),
            Arc::new(PostService::new(Arc::new(InMemoryPostRepository::new()))),
            jwt_service(),
        );

        Self {
            router: create_router_with_state(state, None),
        }
    }

    /// App whose post storage fails every listing
    pub fn with_failing_posts() -> Self {
        let mut repository = MockPostRepository::new();
        repository
            .expect_list()
            .returning(|_, _| Err(DomainError::storage("connection refused")));

        let state = AppState::new(
            user_service(),
            Arc::new(PostService::new(Arc::new(repository))),
            jwt_service(),
        );

        Self {
            router: create_router_with_state(state, None),
        }
    }

    pub async fn raw(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.raw(request).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    /// Register a user with password `secret123`
    pub async fn register(&self, name: &str, email: &str) -> TestUser {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/users/register",
                None,
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "secret123",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");

        TestUser {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }
}
