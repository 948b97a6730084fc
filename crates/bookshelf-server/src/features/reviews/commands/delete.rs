//! Delete review command
//!
//! Soft-deletes the review and decrements the book's counter in one
//! transaction. The decrement runs first and doubles as the book existence
//! check; if the review then turns out to be missing, the transaction rolls
//! back and the counter is untouched.

use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{parse_id, IdValidationError};

/// Command to delete a review
#[derive(Debug, Clone)]
pub struct DeleteReviewCommand {
    pub book_id: String,
    pub review_id: String,
}

/// Errors that can occur when deleting a review
#[derive(Debug, thiserror::Error)]
pub enum DeleteReviewError {
    #[error(transparent)]
    InvalidId(#[from] IdValidationError),

    #[error("Book not found")]
    BookNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for review deletion
#[tracing::instrument(
    skip(pool),
    fields(book_id = %command.book_id, review_id = %command.review_id)
)]
pub async fn handle(pool: PgPool, command: DeleteReviewCommand) -> Result<(), DeleteReviewError> {
    let book_id = parse_id(&command.book_id, "book")?;
    let review_id = parse_id(&command.review_id, "review")?;

    let mut tx = pool.begin().await?;

    let decremented = sqlx::query(
        r#"
        UPDATE books
        SET reviews = reviews - 1, updated_at = NOW()
        WHERE id = $1 AND state = 'active'
        "#,
    )
    .bind(book_id)
    .execute(&mut *tx)
    .await?;

    if decremented.rows_affected() == 0 {
        // Rolls back on drop
        return Err(DeleteReviewError::BookNotFound);
    }

    let deleted = sqlx::query(
        r#"
        UPDATE reviews
        SET state = 'deleted', deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND book_id = $2 AND state = 'active'
        "#,
    )
    .bind(review_id)
    .bind(book_id)
    .execute(&mut *tx)
    .await?;

    if deleted.rows_affected() == 0 {
        // Rolls back on drop, undoing the decrement
        return Err(DeleteReviewError::ReviewNotFound);
    }

    tx.commit().await?;

    tracing::info!(%review_id, %book_id, "Review deleted");

    Ok(())
}
