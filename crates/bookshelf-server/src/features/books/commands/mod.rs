//! Book write operations

pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateBookCommand, CreateBookError, CreateBookResponse};
pub use delete::{DeleteBookCommand, DeleteBookError};
pub use update::{UpdateBookCommand, UpdateBookError, UpdateBookOutcome};
