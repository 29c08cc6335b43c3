//! Request and response types shared by the HTTP handlers

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorCode, ApiErrorResponse};
pub use json::{Json, Query};
