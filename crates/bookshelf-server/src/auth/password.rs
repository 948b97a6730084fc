//! Password hashing
//!
//! Passwords are stored as salted bcrypt hashes. Login compares with
//! `bcrypt::verify`; the raw password is never persisted.

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, stored_hash)
}
