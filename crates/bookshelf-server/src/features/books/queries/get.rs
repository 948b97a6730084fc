//! Get book by id query
//!
//! Returns the book together with its non-deleted reviews as
//! `{bookData, reviewsData}`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{parse_id, IdValidationError};

/// Query for a single book
#[derive(Debug, Clone)]
pub struct GetBookQuery {
    pub book_id: String,
}

/// Full book record returned under `bookData`
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub user_id: Uuid,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub category: String,
    pub subcategory: Vec<String>,
    pub reviews: i32,
    pub book_cover: String,
    pub released_at: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review projection returned under `reviewsData`
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: Uuid,
    pub book_id: Uuid,
    pub reviewed_by: String,
    pub reviewed_at: DateTime<Utc>,
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

/// Response combining the book and its reviews
#[derive(Debug, Clone, Serialize)]
pub struct GetBookResponse {
    #[serde(rename = "bookData")]
    pub book_data: BookDetail,
    #[serde(rename = "reviewsData")]
    pub reviews_data: Vec<ReviewItem>,
}

/// Errors that can occur when fetching a book
#[derive(Debug, thiserror::Error)]
pub enum GetBookError {
    #[error(transparent)]
    InvalidId(#[from] IdValidationError),

    #[error("Book not found")]
    BookNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for fetching a book with its reviews
#[tracing::instrument(skip(pool), fields(book_id = %query.book_id))]
pub async fn handle(pool: PgPool, query: GetBookQuery) -> Result<GetBookResponse, GetBookError> {
    let book_id = parse_id(&query.book_id, "book")?;

    let book = sqlx::query_as::<_, BookDetail>(
        r#"
        SELECT id, title, excerpt, user_id, isbn, category, subcategory,
               reviews, book_cover, released_at, created_at, updated_at
        FROM books
        WHERE id = $1 AND state = 'active'
        "#,
    )
    .bind(book_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetBookError::BookNotFound)?;

    let reviews = sqlx::query_as::<_, ReviewItem>(
        r#"
        SELECT id, book_id, reviewed_by, reviewed_at, rating, review
        FROM reviews
        WHERE book_id = $1 AND state = 'active'
        ORDER BY reviewed_at ASC
        "#,
    )
    .bind(book_id)
    .fetch_all(&pool)
    .await?;

    tracing::debug!(book_id = %book.id, review_count = reviews.len(), "Book retrieved");

    Ok(GetBookResponse {
        book_data: book,
        reviews_data: reviews,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id_message() {
        let err = parse_id("xyz", "book").unwrap_err();
        let err = GetBookError::from(err);
        assert_eq!(err.to_string(), "xyz is not a valid book id");
    }

    #[test]
    fn test_response_envelope_keys() {
        let response = GetBookResponse {
            book_data: BookDetail {
                id: Uuid::nil(),
                title: "T".to_string(),
                excerpt: "E".to_string(),
                user_id: Uuid::nil(),
                isbn: "123".to_string(),
                category: "C".to_string(),
                subcategory: vec![],
                reviews: 0,
                book_cover: "http://example.com/c.png".to_string(),
                released_at: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            reviews_data: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("bookData").is_some());
        assert!(json.get("reviewsData").is_some());
        assert!(json["bookData"].get("ISBN").is_some());
    }
}
