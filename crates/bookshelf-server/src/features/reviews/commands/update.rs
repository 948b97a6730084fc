//! Update review command
//!
//! Partial update of reviewedBy/rating/review. The review must belong to the
//! addressed book and both must still be active. The counter is untouched;
//! only create and delete move it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{
    parse_id, validate_rating, IdValidationError, RatingValidationError,
};

/// Command to update a review
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReviewCommand {
    #[serde(skip)]
    pub book_id: String,
    #[serde(skip)]
    pub review_id: String,

    #[serde(default, rename = "reviewedBy")]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub review: Option<String>,
}

/// Updated review as returned to the caller
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub rating: i32,
    pub reviewed_by: String,
    pub reviewed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

/// Outcome of an update: either the refreshed review or a note that the
/// caller sent nothing to change.
#[derive(Debug)]
pub enum UpdateReviewOutcome {
    Updated(UpdateReviewResponse),
    Unmodified,
}

/// Errors that can occur when updating a review
#[derive(Debug, thiserror::Error)]
pub enum UpdateReviewError {
    #[error(transparent)]
    InvalidId(#[from] IdValidationError),

    #[error(transparent)]
    Rating(#[from] RatingValidationError),

    #[error("Book not found")]
    BookNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateReviewCommand {
    fn has_changes(&self) -> bool {
        self.reviewer().is_some() || self.rating.is_some() || self.review_text().is_some()
    }

    fn reviewer(&self) -> Option<String> {
        self.reviewed_by
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    fn review_text(&self) -> Option<String> {
        self.review
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

/// Handler function for review updates
#[tracing::instrument(
    skip(pool, command),
    fields(book_id = %command.book_id, review_id = %command.review_id)
)]
pub async fn handle(
    pool: PgPool,
    command: UpdateReviewCommand,
) -> Result<UpdateReviewOutcome, UpdateReviewError> {
    let book_id = parse_id(&command.book_id, "book")?;
    let review_id = parse_id(&command.review_id, "review")?;

    if let Some(rating) = command.rating {
        validate_rating(rating)?;
    }

    let book_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1 AND state = 'active')")
            .bind(book_id)
            .fetch_one(&pool)
            .await?;
    if !book_exists {
        return Err(UpdateReviewError::BookNotFound);
    }

    if !command.has_changes() {
        let review_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE id = $1 AND book_id = $2 AND state = 'active')",
        )
        .bind(review_id)
        .bind(book_id)
        .fetch_one(&pool)
        .await?;
        if !review_exists {
            return Err(UpdateReviewError::ReviewNotFound);
        }
        return Ok(UpdateReviewOutcome::Unmodified);
    }

    let reviewer = command.reviewer();
    let review_text = command.review_text();

    let record = sqlx::query_as::<_, UpdateReviewResponse>(
        r#"
        UPDATE reviews
        SET reviewed_by = COALESCE($3, reviewed_by),
            rating = COALESCE($4, rating),
            review = COALESCE($5, review),
            updated_at = NOW()
        WHERE id = $1 AND book_id = $2 AND state = 'active'
        RETURNING id, book_id, rating, reviewed_by, reviewed_at, review
        "#,
    )
    .bind(review_id)
    .bind(book_id)
    .bind(&reviewer)
    .bind(command.rating)
    .bind(&review_text)
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateReviewError::ReviewNotFound)?;

    tracing::info!(review_id = %record.id, %book_id, "Review updated");

    Ok(UpdateReviewOutcome::Updated(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_rating_is_rejected() {
        let err = validate_rating(9).unwrap_err();
        let err = UpdateReviewError::from(err);
        assert_eq!(err.to_string(), "rating should be in a range 1-5");
    }

    #[test]
    fn test_blank_fields_fall_back_to_stored_values() {
        let cmd = UpdateReviewCommand {
            book_id: Uuid::new_v4().to_string(),
            review_id: Uuid::new_v4().to_string(),
            reviewed_by: Some("  ".to_string()),
            rating: None,
            review: Some("".to_string()),
        };
        assert_eq!(cmd.reviewer(), None);
        assert_eq!(cmd.review_text(), None);
    }

    #[test]
    fn test_empty_body_counts_as_no_changes() {
        let cmd = UpdateReviewCommand {
            book_id: Uuid::new_v4().to_string(),
            review_id: Uuid::new_v4().to_string(),
            reviewed_by: Some("  ".to_string()),
            rating: None,
            review: None,
        };
        assert!(!cmd.has_changes());

        let cmd = UpdateReviewCommand {
            rating: Some(4),
            ..cmd
        };
        assert!(cmd.has_changes());
    }

    #[test]
    fn test_invalid_review_id_names_the_label() {
        let err = parse_id("zzz", "review").unwrap_err();
        assert_eq!(err.to_string(), "zzz is not a valid review id");
    }

    use crate::features::reviews::commands::create::{self, CreateReviewCommand};
    use crate::features::shared::test_helpers::{TestBook, TestUser};

    async fn seed_review(pool: &PgPool, book_id: Uuid) -> Uuid {
        let cmd = CreateReviewCommand {
            book_id: book_id.to_string(),
            reviewed_by: Some("Jane".to_string()),
            rating: Some(3),
            review: Some("Fine".to_string()),
        };
        create::handle(pool.clone(), cmd).await.unwrap().id
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_empty_body_short_circuits_without_writing(pool: PgPool) -> sqlx::Result<()> {
        let user = TestUser::new("updater@example.com", "9000000012")
            .insert(&pool)
            .await?;
        let book = TestBook::new(user.id, "Stable Book", "979-8-010")
            .insert(&pool)
            .await?;
        let review_id = seed_review(&pool, book.id).await;

        let before: DateTime<Utc> =
            sqlx::query_scalar("SELECT updated_at FROM reviews WHERE id = $1")
                .bind(review_id)
                .fetch_one(&pool)
                .await?;

        let cmd = UpdateReviewCommand {
            book_id: book.id.to_string(),
            review_id: review_id.to_string(),
            reviewed_by: None,
            rating: None,
            review: None,
        };
        let outcome = handle(pool.clone(), cmd).await.unwrap();
        assert!(matches!(outcome, UpdateReviewOutcome::Unmodified));

        let after: DateTime<Utc> =
            sqlx::query_scalar("SELECT updated_at FROM reviews WHERE id = $1")
                .bind(review_id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(before, after);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_empty_body_still_reports_missing_review(pool: PgPool) -> sqlx::Result<()> {
        let user = TestUser::new("phantom@example.com", "9000000013")
            .insert(&pool)
            .await?;
        let book = TestBook::new(user.id, "Phantom Book", "979-8-011")
            .insert(&pool)
            .await?;

        let cmd = UpdateReviewCommand {
            book_id: book.id.to_string(),
            review_id: Uuid::new_v4().to_string(),
            reviewed_by: None,
            rating: None,
            review: None,
        };
        let err = handle(pool.clone(), cmd).await.unwrap_err();
        assert!(matches!(err, UpdateReviewError::ReviewNotFound));
        Ok(())
    }
}
