//! Configuration module

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, FeedConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
    StorageBackend, StorageConfig, UsersConfig,
};
