//! Login token service
//!
//! Issues and verifies the opaque signed tokens handed out at login. Tokens
//! are HS256 JWTs whose subject is the user id; they carry no other claims
//! and are not persisted server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in a login token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued to
    pub sub: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Errors from token issue/verification
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Invalid or expired token")]
    Invalid,
}

/// Issues and verifies login tokens
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue a signed token embedding the given user id
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(TokenError::Signing)
    }

    /// Verify a token and return the user id it was issued to
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map_err(|_| TokenError::Invalid)?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 3600)
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();
        assert!(!token.is_empty());

        let verified = service.verify(&token).unwrap();
        assert_eq!(verified, user_id);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = service();
        assert!(matches!(
            service.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let user_id = Uuid::new_v4();
        let token = TokenService::new("secret-a", 3600).issue(user_id).unwrap();

        let other = TokenService::new("secret-b", 3600);
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let user_id = Uuid::new_v4();
        // TTL in the past; jsonwebtoken's default leeway is 60s, so go well
        // beyond it.
        let token = TokenService::new("secret", -3600).issue(user_id).unwrap();

        let service = TokenService::new("secret", 3600);
        assert!(matches!(service.verify(&token), Err(TokenError::Invalid)));
    }
}
