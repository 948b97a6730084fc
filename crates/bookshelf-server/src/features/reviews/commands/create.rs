//! Create review command
//!
//! Inserting the review and bumping the book's `reviews` counter happen in
//! one transaction; the counter update doubles as the existence check, since
//! it only matches an active book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    parse_id, validate_rating, IdValidationError, RatingValidationError,
};

/// Name recorded when the caller does not sign the review
pub const DEFAULT_REVIEWER: &str = "Guest";

/// Command to add a review to a book
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewCommand {
    #[serde(skip)]
    pub book_id: String,

    #[serde(default, rename = "reviewedBy")]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub review: Option<String>,
}

/// Trimmed review projection returned to the caller
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub rating: i32,
    pub reviewed_by: String,
    pub reviewed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

/// Errors that can occur when creating a review
#[derive(Debug, thiserror::Error)]
pub enum CreateReviewError {
    #[error(transparent)]
    InvalidId(#[from] IdValidationError),

    #[error(transparent)]
    Rating(#[from] RatingValidationError),

    #[error("Book not found")]
    BookNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateReviewCommand {
    fn reviewer(&self) -> String {
        self.reviewed_by
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_REVIEWER)
            .to_string()
    }

    fn review_text(&self) -> Option<String> {
        self.review
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

/// Handler function for review creation
#[tracing::instrument(skip(pool, command), fields(book_id = %command.book_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateReviewCommand,
) -> Result<CreateReviewResponse, CreateReviewError> {
    let book_id = parse_id(&command.book_id, "book")?;

    let rating = command.rating.ok_or(RatingValidationError::Required)?;
    validate_rating(rating)?;

    let reviewer = command.reviewer();
    let review_text = command.review_text();

    let mut tx = pool.begin().await?;

    let bumped = sqlx::query(
        r#"
        UPDATE books
        SET reviews = reviews + 1, updated_at = NOW()
        WHERE id = $1 AND state = 'active'
        "#,
    )
    .bind(book_id)
    .execute(&mut *tx)
    .await?;

    if bumped.rows_affected() == 0 {
        // Rolls back on drop
        return Err(CreateReviewError::BookNotFound);
    }

    let record = sqlx::query_as::<_, CreateReviewResponse>(
        r#"
        INSERT INTO reviews (book_id, reviewed_by, rating, review)
        VALUES ($1, $2, $3, $4)
        RETURNING id, book_id, rating, reviewed_by, reviewed_at, review
        "#,
    )
    .bind(book_id)
    .bind(&reviewer)
    .bind(rating)
    .bind(&review_text)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(review_id = %record.id, %book_id, "Review added");

    Ok(record)
}
