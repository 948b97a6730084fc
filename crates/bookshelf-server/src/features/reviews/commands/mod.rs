//! Review write operations

pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateReviewCommand, CreateReviewError, CreateReviewResponse};
pub use delete::{DeleteReviewCommand, DeleteReviewError};
pub use update::{UpdateReviewCommand, UpdateReviewError, UpdateReviewOutcome, UpdateReviewResponse};
