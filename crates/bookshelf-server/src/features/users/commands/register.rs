//! Register user command
//!
//! Validates the registration payload, hashes the password, and inserts the
//! user. Duplicate phone/email are enforced by the unique constraints on the
//! table; the violation is translated to the user-facing message by
//! constraint name, so there is no lookup-then-insert window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::features::shared::validation::{
    is_present, validate_email, validate_password, validate_phone, validate_title,
    EmailValidationError, PasswordValidationError, PhoneValidationError, TitleValidationError,
};
use crate::models::{Address, Title};

/// Command to register a new user
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserCommand {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Response from registering a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserResponse {
    pub id: Uuid,
    pub title: Title,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when registering a user
#[derive(Debug, thiserror::Error)]
pub enum RegisterUserError {
    #[error("name is required")]
    NameRequired,

    #[error(transparent)]
    Phone(#[from] PhoneValidationError),

    #[error(transparent)]
    Title(#[from] TitleValidationError),

    #[error(transparent)]
    Email(#[from] EmailValidationError),

    #[error(transparent)]
    Password(#[from] PasswordValidationError),

    #[error("{0} is already registered")]
    DuplicatePhone(String),

    #[error("{0} email address is already registered")]
    DuplicateEmail(String),

    #[error("Failed to hash password: {0}")]
    Hash(bcrypt::BcryptError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Validated registration fields
#[derive(Debug)]
struct ValidatedRegistration {
    title: Title,
    name: String,
    phone: String,
    email: String,
    password: String,
    address: Address,
}

impl RegisterUserCommand {
    /// Validates the command in the same field order the API documents:
    /// name, phone, title, email, password.
    fn validate(&self) -> Result<ValidatedRegistration, RegisterUserError> {
        let name = self
            .name
            .as_deref()
            .filter(|n| is_present(n))
            .ok_or(RegisterUserError::NameRequired)?;

        let phone = self.phone.as_deref().unwrap_or_default();
        validate_phone(phone)?;

        let title = self.title.as_deref().unwrap_or_default();
        validate_title(title)?;
        // validate_title guarantees membership in the accepted set
        let title = Title::from_str(title).map_err(|_| TitleValidationError::Unknown)?;

        let email = self.email.as_deref().unwrap_or_default();
        validate_email(email)?;

        let password = self.password.as_deref().unwrap_or_default();
        validate_password(password)?;

        Ok(ValidatedRegistration {
            title,
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
            email: email.trim().to_lowercase(),
            password: password.to_string(),
            address: self.address.clone().unwrap_or_default(),
        })
    }
}

// Database record structure for the insert
#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: Uuid,
    title: Title,
    name: String,
    phone: String,
    email: String,
    street: Option<String>,
    city: Option<String>,
    pincode: Option<String>,
    created_at: DateTime<Utc>,
}

/// Handler function for user registration
#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: PgPool,
    command: RegisterUserCommand,
) -> Result<RegisterUserResponse, RegisterUserError> {
    let fields = command.validate()?;

    let password_hash = hash_password(&fields.password).map_err(RegisterUserError::Hash)?;

    let record = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (title, name, phone, email, password_hash, street, city, pincode)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, name, phone, email, street, city, pincode, created_at
        "#,
    )
    .bind(fields.title)
    .bind(&fields.name)
    .bind(&fields.phone)
    .bind(&fields.email)
    .bind(&password_hash)
    .bind(&fields.address.street)
    .bind(&fields.address.city)
    .bind(&fields.address.pincode)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return match db_err.constraint() {
                    Some("users_phone_key") => {
                        RegisterUserError::DuplicatePhone(fields.phone.clone())
                    },
                    Some("users_email_key") => {
                        RegisterUserError::DuplicateEmail(fields.email.clone())
                    },
                    _ => RegisterUserError::Database(e),
                };
            }
        }
        RegisterUserError::Database(e)
    })?;

    tracing::info!(user_id = %record.id, "User registered");

    Ok(RegisterUserResponse {
        id: record.id,
        title: record.title,
        name: record.name,
        phone: record.phone,
        email: record.email,
        address: Address {
            street: record.street,
            city: record.city,
            pincode: record.pincode,
        },
        created_at: record.created_at,
    })
}
