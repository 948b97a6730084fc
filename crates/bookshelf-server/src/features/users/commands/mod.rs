//! User write operations

pub mod login;
pub mod register;

pub use login::{LoginUserCommand, LoginUserError, LoginUserResponse};
pub use register::{RegisterUserCommand, RegisterUserError, RegisterUserResponse};
