//! Post domain
//!
//! Posts with their embedded comments and like sets, content validation, and
//! the repository trait with its atomic update primitives.

mod entity;
mod repository;
mod validation;

pub use entity::{Comment, Post, PostId};
pub use repository::{LikeToggle, PostFilter, PostRepository};
pub use validation::{normalize_comment_text, normalize_content, PostValidationError};

#[cfg(test)]
pub use repository::MockPostRepository;
