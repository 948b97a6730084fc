//! Authentication: token issue/verify, password hashing, caller extraction

pub mod extract;
pub mod password;
pub mod token;

pub use extract::AuthUser;
pub use token::{TokenError, TokenService};
