//! ProCircle API
//!
//! A minimal professional social network backend:
//! - User directory with registration, login and profiles
//! - Post feed with ownership-gated edits, likes and comments
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, PostServiceTrait, UserServiceTrait};
use config::StorageBackend;
use infrastructure::{
    auth::{JwtConfig, JwtGenerator, JwtService},
    post::{InMemoryPostRepository, PostService, PostgresPostRepository},
    storage::{connect_pool, run_schema_migrations, PostgresConfig},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};
use rand::Rng;
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    info!("Storage backend: {:?}", config.storage.backend);

    let hasher = Arc::new(Argon2Hasher::new());
    let min_password_length = config.users.min_password_length;

    let (user_service, post_service): (Arc<dyn UserServiceTrait>, Arc<dyn PostServiceTrait>) =
        match config.storage.backend {
            StorageBackend::Postgres => {
                let pool = connect_pool(&postgres_config(config)?).await?;
                run_schema_migrations(&pool).await?;

                (
                    Arc::new(
                        UserService::new(Arc::new(PostgresUserRepository::new(pool.clone())), hasher)
                            .with_min_password_length(min_password_length),
                    ),
                    Arc::new(PostService::new(Arc::new(PostgresPostRepository::new(pool)))),
                )
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage; data is lost on restart");

                (
                    Arc::new(
                        UserService::new(Arc::new(InMemoryUserRepository::new()), hasher)
                            .with_min_password_length(min_password_length),
                    ),
                    Arc::new(PostService::new(Arc::new(InMemoryPostRepository::new()))),
                )
            }
        };

    let jwt_service = create_jwt_service(config);

    Ok(AppState::new(user_service, post_service, jwt_service)
        .with_default_page_size(config.feed.default_page_size))
}

/// PostgreSQL settings from config, requiring a database URL
pub fn postgres_config(config: &AppConfig) -> anyhow::Result<PostgresConfig> {
    let url = config.database_url().ok_or_else(|| {
        anyhow::anyhow!("storage.database_url or DATABASE_URL is required for the postgres backend")
    })?;

    Ok(PostgresConfig::new(url).with_max_connections(config.storage.max_connections))
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Create JWT service from secret (config, env var, or random)
fn create_jwt_service(config: &AppConfig) -> Arc<dyn JwtGenerator> {
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .or_else(|| std::env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| {
            tracing::warn!(
                "No JWT_SECRET configured. Generating random secret. \
                Sessions will NOT persist across restarts."
            );
            generate_random_secret()
        });

    Arc::new(JwtService::new(JwtConfig::new(
        jwt_secret,
        config.auth.expiration_hours,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secret_shape() {
        let secret = generate_random_secret();

        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(secret, generate_random_secret());
    }

    #[test]
    fn test_postgres_config_from_storage_section() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Postgres;
        config.storage.database_url = Some("postgres://db/procircle".to_string());
        config.storage.max_connections = 4;

        let pg = postgres_config(&config).unwrap();
        assert_eq!(pg.url, "postgres://db/procircle");
        assert_eq!(pg.max_connections, 4);
    }

    #[tokio::test]
    async fn test_memory_state_uses_configured_page_size() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("test-secret".to_string());
        config.feed.default_page_size = 25;

        let state = create_app_state_with_config(&config).await.unwrap();

        assert_eq!(state.default_page_size, 25);
        assert_eq!(state.user_service.count().await.unwrap(), 0);
        assert_eq!(state.jwt_service.expiration_hours(), 24);
    }
}
