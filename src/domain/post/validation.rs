//! Post and comment text validation

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PostValidationError {
    #[error("Post content is required")]
    EmptyContent,

    #[error("Comment text is required")]
    EmptyCommentText,
}

/// Trim post content; whitespace-only content is rejected
pub fn normalize_content(content: &str) -> Result<String, PostValidationError> {
    let content = content.trim();

    if content.is_empty() {
        return Err(PostValidationError::EmptyContent);
    }

    Ok(content.to_string())
}

/// Trim comment text; whitespace-only text is rejected
pub fn normalize_comment_text(text: &str) -> Result<String, PostValidationError> {
    let text = text.trim();

    if text.is_empty() {
        return Err(PostValidationError::EmptyCommentText);
    }

    Ok(text.to_string())
}
