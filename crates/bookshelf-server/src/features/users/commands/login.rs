//! Login user command
//!
//! Verifies the credentials against the stored bcrypt hash and issues a
//! signed token. A missing user and a wrong password both map to the same
//! error so the response does not reveal which part failed.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::verify_password;
use crate::auth::token::{TokenError, TokenService};
use crate::features::shared::validation::{
    is_present, validate_email, EmailValidationError, PasswordValidationError,
};

/// Command to log a user in
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUserCommand {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response from a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginUserResponse {
    pub token: String,
}

/// Errors that can occur when logging in
#[derive(Debug, thiserror::Error)]
pub enum LoginUserError {
    #[error(transparent)]
    Email(#[from] EmailValidationError),

    #[error(transparent)]
    Password(#[from] PasswordValidationError),

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Failed to issue token: {0}")]
    Token(TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LoginUserCommand {
    fn validate(&self) -> Result<(String, String), LoginUserError> {
        let email = self.email.as_deref().unwrap_or_default();
        validate_email(email)?;

        // Only presence is checked here. Length rules belong to registration;
        // at login any mismatch surfaces as invalid credentials.
        let password = self.password.as_deref().unwrap_or_default();
        if !is_present(password) {
            return Err(PasswordValidationError::Required.into());
        }

        Ok((email.trim().to_lowercase(), password.to_string()))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRecord {
    id: Uuid,
    password_hash: String,
}

/// Handler function for user login
#[tracing::instrument(skip(pool, tokens, command))]
pub async fn handle(
    pool: PgPool,
    tokens: &TokenService,
    command: LoginUserCommand,
) -> Result<LoginUserResponse, LoginUserError> {
    let (email, password) = command.validate()?;

    let record = sqlx::query_as::<_, CredentialRecord>(
        "SELECT id, password_hash FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await?
    .ok_or(LoginUserError::InvalidCredentials)?;

    let matches =
        verify_password(&password, &record.password_hash).unwrap_or(false);
    if !matches {
        return Err(LoginUserError::InvalidCredentials);
    }

    let token = tokens.issue(record.id).map_err(LoginUserError::Token)?;

    tracing::info!(user_id = %record.id, "User logged in");

    Ok(LoginUserResponse { token })
}
