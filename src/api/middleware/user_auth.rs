//! User authentication extractor using JWT bearer tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;
use crate::domain::DomainError;

/// Extractor that requires a valid session token for an existing user
///
/// Reads `Authorization: Bearer <jwt>`; any failure is a 401.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state.jwt_service.validate(&token).map_err(|e| {
            debug!(error = %e, "Rejected session token");
            ApiError::unauthenticated("Token is not valid")
        })?;

        let user_id = claims.user_id()?;

        let user = match state.user_service.get_by_id(&user_id).await {
            Ok(user) => user,
            Err(DomainError::NotFound { .. }) => {
                debug!(user_id = %user_id, "Token refers to an unknown user");
                return Err(ApiError::unauthenticated("User not found"));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(RequireUser(user))
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    token.map(str::to_string).ok_or_else(|| {
        ApiError::unauthenticated("No token, authorization denied")
    })
}
