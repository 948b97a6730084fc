//! User API routes
//!
//! - `POST /register` - Register a new user
//! - `POST /login` - Log in and receive a token

use axum::{
    extract::State,
    http::{header::HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::api::extract::ApiJson;
use crate::api::response::{ApiError, ApiResponse};
use crate::auth::extract::API_KEY_HEADER;
use crate::features::FeatureState;

use super::commands::{
    login::LoginUserError, register::RegisterUserError, LoginUserCommand, RegisterUserCommand,
};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the user router with registration and login routes
pub fn user_routes() -> Router<FeatureState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new user
///
/// # Response
///
/// - `201 Created` - User registered
/// - `400 Bad Request` - Validation error or duplicate phone/email
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state, command))]
async fn register_user(
    State(state): State<FeatureState>,
    ApiJson(command): ApiJson<RegisterUserCommand>,
) -> Result<Response, ApiError> {
    let response = super::commands::register::handle(state.db, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Success", response)),
    )
        .into_response())
}

/// Log in with email and password
///
/// The issued token is returned in the body and echoed in the `x-api-key`
/// response header so clients can pass it straight back.
///
/// # Response
///
/// - `200 OK` - Login succeeded, token issued
/// - `400 Bad Request` - Validation error
/// - `401 Unauthorized` - Unknown email or wrong password
#[tracing::instrument(skip(state, command))]
async fn login_user(
    State(state): State<FeatureState>,
    ApiJson(command): ApiJson<LoginUserCommand>,
) -> Result<Response, ApiError> {
    let result = super::commands::login::handle(state.db, &state.tokens, command).await?;

    let token_header = HeaderValue::from_str(&result.token)
        .map_err(|e| ApiError::Internal(format!("Token is not a valid header value: {}", e)))?;

    let mut response =
        (StatusCode::OK, Json(ApiResponse::success("success", result))).into_response();
    response.headers_mut().insert(API_KEY_HEADER, token_header);

    Ok(response)
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<RegisterUserError> for ApiError {
    fn from(err: RegisterUserError) -> Self {
        match err {
            RegisterUserError::NameRequired
            | RegisterUserError::Phone(_)
            | RegisterUserError::Title(_)
            | RegisterUserError::Email(_)
            | RegisterUserError::Password(_)
            | RegisterUserError::DuplicatePhone(_)
            | RegisterUserError::DuplicateEmail(_) => ApiError::BadRequest(err.to_string()),
            RegisterUserError::Hash(e) => ApiError::Internal(e.to_string()),
            RegisterUserError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<LoginUserError> for ApiError {
    fn from(err: LoginUserError) -> Self {
        match err {
            LoginUserError::Email(_) | LoginUserError::Password(_) => {
                ApiError::BadRequest(err.to_string())
            },
            LoginUserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            LoginUserError::Token(e) => ApiError::Internal(e.to_string()),
            LoginUserError::Database(e) => ApiError::Database(e),
        }
    }
}
