//! Authenticated-caller extractor
//!
//! Handlers that mutate books take an [`AuthUser`] argument; extraction
//! verifies the login token and injects the caller's user id. The token is
//! read from the `x-api-key` header (where login returns it) or from a
//! standard `Authorization: Bearer` header.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::api::response::ApiError;
use crate::features::FeatureState;

/// Header login tokens are issued and accepted on
pub const API_KEY_HEADER: &str = "x-api-key";

/// Verified identity of the calling user
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<FeatureState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &FeatureState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .or_else(|| {
                parts
                    .headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.strip_prefix("Bearer "))
            })
            .ok_or_else(|| ApiError::Unauthorized("Missing authentication token".to_string()))?;

        let user_id = state
            .tokens
            .verify(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser(user_id))
    }
}
