//! Domain layer - entities, validation rules and repository traits

pub mod error;
pub mod pagination;
pub mod post;
pub mod user;

pub use error::DomainError;
pub use pagination::{Page, PageRequest};
pub use post::{Comment, LikeToggle, Post, PostFilter, PostId, PostRepository};
pub use user::{ProfileUpdate, User, UserId, UserRepository};
