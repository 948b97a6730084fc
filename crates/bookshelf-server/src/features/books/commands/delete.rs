//! Delete book command
//!
//! Owner-only soft delete: the book's lifecycle state flips to `deleted` and
//! `deleted_at` is stamped in the same statement, so an already-deleted book
//! reads as not found.

use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{parse_id, IdValidationError};

/// Command to delete a book
#[derive(Debug, Clone)]
pub struct DeleteBookCommand {
    pub book_id: String,
    pub user_id: Uuid,
}

/// Errors that can occur when deleting a book
#[derive(Debug, thiserror::Error)]
pub enum DeleteBookError {
    #[error(transparent)]
    InvalidId(#[from] IdValidationError),

    #[error("Book not found")]
    BookNotFound,

    #[error("You don't have access to this book")]
    NotOwner,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, sqlx::FromRow)]
struct OwnedBook {
    user_id: Uuid,
}

/// Handler function for book deletion
#[tracing::instrument(skip(pool), fields(book_id = %command.book_id, user_id = %command.user_id))]
pub async fn handle(pool: PgPool, command: DeleteBookCommand) -> Result<(), DeleteBookError> {
    let book_id = parse_id(&command.book_id, "book")?;

    let owner = sqlx::query_as::<_, OwnedBook>(
        "SELECT user_id FROM books WHERE id = $1 AND state = 'active'",
    )
    .bind(book_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(DeleteBookError::BookNotFound)?;

    if owner.user_id != command.user_id {
        return Err(DeleteBookError::NotOwner);
    }

    let result = sqlx::query(
        r#"
        UPDATE books
        SET state = 'deleted', deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND state = 'active'
        "#,
    )
    .bind(book_id)
    .execute(&pool)
    .await?;

    // Deleted between the ownership check and the update
    if result.rows_affected() == 0 {
        return Err(DeleteBookError::BookNotFound);
    }

    tracing::info!(%book_id, "Book deleted");

    Ok(())
}
