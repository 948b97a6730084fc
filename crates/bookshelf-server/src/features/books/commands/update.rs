//! Update book command
//!
//! Partial update of title/excerpt/releasedAt/ISBN, owner-only. A body with
//! no recognized fields is not an error; the book is simply left unmodified.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{parse_id, IdValidationError};

/// Command to update a book
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookCommand {
    #[serde(skip)]
    pub book_id: String,
    #[serde(skip)]
    pub user_id: Uuid,

    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, rename = "ISBN")]
    pub isbn: Option<String>,
    #[serde(default, rename = "releasedAt")]
    pub released_at: Option<NaiveDate>,
}

/// Updated book as returned to the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookResponse {
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
    pub updated_at: DateTime<Utc>,
}

/// Result of the update: either the book changed, or the request carried
/// nothing to change.
#[derive(Debug)]
pub enum UpdateBookOutcome {
    Updated(UpdateBookResponse),
    Unmodified,
}

/// Errors that can occur when updating a book
#[derive(Debug, thiserror::Error)]
pub enum UpdateBookError {
    #[error(transparent)]
    InvalidId(#[from] IdValidationError),

    #[error("Book not found")]
    BookNotFound,

    #[error("You don't have access to this book")]
    NotOwner,

    #[error("{0} Title is already used")]
    DuplicateTitle(String),

    #[error("{0} already exists")]
    DuplicateIsbn(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateBookCommand {
    fn has_changes(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
            || self.excerpt.as_deref().is_some_and(|e| !e.trim().is_empty())
            || self.isbn.as_deref().is_some_and(|i| !i.trim().is_empty())
            || self.released_at.is_some()
    }

    fn trimmed(field: &Option<String>) -> Option<String> {
        field
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OwnedBook {
    user_id: Uuid,
}

#[derive(Debug, sqlx::FromRow)]
struct BookRecord {
    id: Uuid,
    title: String,
    excerpt: String,
    user_id: Uuid,
    isbn: String,
    category: String,
    subcategory: Vec<String>,
    reviews: i32,
    book_cover: String,
    released_at: NaiveDate,
    updated_at: DateTime<Utc>,
}

/// Handler function for book updates
#[tracing::instrument(skip(pool, command), fields(book_id = %command.book_id, user_id = %command.user_id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateBookCommand,
) -> Result<UpdateBookOutcome, UpdateBookError> {
    let book_id = parse_id(&command.book_id, "book")?;

    let owner = sqlx::query_as::<_, OwnedBook>(
        "SELECT user_id FROM books WHERE id = $1 AND state = 'active'",
    )
    .bind(book_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(UpdateBookError::BookNotFound)?;

    if owner.user_id != command.user_id {
        return Err(UpdateBookError::NotOwner);
    }

    if !command.has_changes() {
        return Ok(UpdateBookOutcome::Unmodified);
    }

    let title = UpdateBookCommand::trimmed(&command.title);
    let excerpt = UpdateBookCommand::trimmed(&command.excerpt);
    let isbn = UpdateBookCommand::trimmed(&command.isbn);

    let record = sqlx::query_as::<_, BookRecord>(
        r#"
        UPDATE books
        SET title = COALESCE($2, title),
            excerpt = COALESCE($3, excerpt),
            isbn = COALESCE($4, isbn),
            released_at = COALESCE($5, released_at),
            updated_at = NOW()
        WHERE id = $1 AND state = 'active'
        RETURNING id, title, excerpt, user_id, isbn, category, subcategory,
                  reviews, book_cover, released_at, updated_at
        "#,
    )
    .bind(book_id)
    .bind(&title)
    .bind(&excerpt)
    .bind(&isbn)
    .bind(command.released_at)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return match db_err.constraint() {
                    Some("books_title_key") => {
                        UpdateBookError::DuplicateTitle(title.clone().unwrap_or_default())
                    },
                    Some("books_isbn_key") => {
                        UpdateBookError::DuplicateIsbn(isbn.clone().unwrap_or_default())
                    },
                    _ => UpdateBookError::Database(e),
                };
            }
        }
        UpdateBookError::Database(e)
    })?
    // Deleted between the ownership check and the update
    .ok_or(UpdateBookError::BookNotFound)?;

    tracing::info!(book_id = %record.id, "Book updated");

    Ok(UpdateBookOutcome::Updated(UpdateBookResponse {
        id: record.id,
        title: record.title,
        excerpt: record.excerpt,
        user_id: record.user_id,
        isbn: record.isbn,
        category: record.category,
        subcategory: record.subcategory,
        reviews: record.reviews,
        book_cover: record.book_cover,
        released_at: record.released_at,
        updated_at: record.updated_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> UpdateBookCommand {
        UpdateBookCommand {
            book_id: Uuid::new_v4().to_string(),
            user_id: Uuid::new_v4(),
            title: None,
            excerpt: None,
            isbn: None,
            released_at: None,
        }
    }

    #[test]
    fn test_empty_body_has_no_changes() {
        assert!(!base_command().has_changes());
    }

    #[test]
    fn test_blank_fields_count_as_absent() {
        let mut cmd = base_command();
        cmd.title = Some("   ".to_string());
        assert!(!cmd.has_changes());
        assert_eq!(UpdateBookCommand::trimmed(&cmd.title), None);
    }

    #[test]
    fn test_any_field_counts_as_change() {
        let mut cmd = base_command();
        cmd.excerpt = Some("New excerpt".to_string());
        assert!(cmd.has_changes());

        let mut cmd = base_command();
        cmd.released_at = NaiveDate::from_ymd_opt(2021, 1, 1);
        assert!(cmd.has_changes());
    }

    #[test]
    fn test_body_deserializes_renamed_fields() {
        let cmd: UpdateBookCommand =
            serde_json::from_str(r#"{"ISBN": "123-X", "releasedAt": "2021-09-01"}"#).unwrap();
        assert_eq!(cmd.isbn.as_deref(), Some("123-X"));
        assert_eq!(cmd.released_at, NaiveDate::from_ymd_opt(2021, 9, 1));
    }

    use crate::features::shared::test_helpers::{TestBook, TestUser};

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_non_owner_is_rejected_and_book_untouched(pool: PgPool) -> sqlx::Result<()> {
        let owner = TestUser::new("owner@example.com", "9000000005")
            .insert(&pool)
            .await?;
        let intruder = TestUser::new("intruder@example.com", "9000000006")
            .insert(&pool)
            .await?;
        let book = TestBook::new(owner.id, "Owned Book", "979-8-005")
            .insert(&pool)
            .await?;

        let mut cmd = base_command();
        cmd.book_id = book.id.to_string();
        cmd.user_id = intruder.id;
        cmd.title = Some("Hijacked".to_string());

        let err = handle(pool.clone(), cmd).await.unwrap_err();
        assert!(matches!(err, UpdateBookError::NotOwner));

        let title: String = sqlx::query_scalar("SELECT title FROM books WHERE id = $1")
            .bind(book.id)
            .fetch_one(&pool)
            .await?;
        assert_eq!(title, "Owned Book");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_deleted_book_reads_as_not_found(pool: PgPool) -> sqlx::Result<()> {
        let owner = TestUser::new("departed@example.com", "9000000007")
            .insert(&pool)
            .await?;
        let book = TestBook::new(owner.id, "Departed Book", "979-8-006")
            .insert(&pool)
            .await?;
        book.soft_delete(&pool).await?;

        let mut cmd = base_command();
        cmd.book_id = book.id.to_string();
        cmd.user_id = owner.id;
        cmd.title = Some("Back From The Dead".to_string());

        let err = handle(pool.clone(), cmd).await.unwrap_err();
        assert!(matches!(err, UpdateBookError::BookNotFound));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_empty_body_short_circuits_without_writing(pool: PgPool) -> sqlx::Result<()> {
        let owner = TestUser::new("idle@example.com", "9000000008")
            .insert(&pool)
            .await?;
        let book = TestBook::new(owner.id, "Idle Book", "979-8-007")
            .insert(&pool)
            .await?;

        let before: chrono::DateTime<Utc> =
            sqlx::query_scalar("SELECT updated_at FROM books WHERE id = $1")
                .bind(book.id)
                .fetch_one(&pool)
                .await?;

        let mut cmd = base_command();
        cmd.book_id = book.id.to_string();
        cmd.user_id = owner.id;

        let outcome = handle(pool.clone(), cmd).await.unwrap();
        assert!(matches!(outcome, UpdateBookOutcome::Unmodified));

        let after: chrono::DateTime<Utc> =
            sqlx::query_scalar("SELECT updated_at FROM books WHERE id = $1")
                .bind(book.id)
                .fetch_one(&pool)
                .await?;
        assert_eq!(before, after);
        Ok(())
    }
}
