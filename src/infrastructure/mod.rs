//! Infrastructure layer - Repository, auth and runtime implementations

pub mod auth;
pub mod logging;
pub mod observability;
pub mod post;
pub mod storage;
pub mod user;
