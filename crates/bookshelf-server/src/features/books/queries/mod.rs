//! Book read operations

pub mod get;
pub mod list;

pub use get::{GetBookError, GetBookQuery, GetBookResponse};
pub use list::{BookListItem, ListBooksError, ListBooksQuery};
