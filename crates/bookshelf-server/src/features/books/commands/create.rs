//! Create book command
//!
//! The request is multipart: a `json` part carrying the book fields and a
//! file part carrying the cover image. The route layer parses the multipart
//! body into this command; the owning user id comes from the verified token,
//! never from the payload.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::is_present;
use crate::storage::Storage;

/// Subcategory accepts either a single string or a list of strings;
/// both normalize to a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubcategoryInput {
    One(String),
    Many(Vec<String>),
}

impl SubcategoryInput {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            SubcategoryInput::One(value) => vec![value],
            SubcategoryInput::Many(values) => values,
        }
    }
}

/// Book fields carried in the `json` multipart part
#[derive(Debug, Clone, Deserialize)]
pub struct BookFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, rename = "ISBN")]
    pub isbn: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<SubcategoryInput>,
    #[serde(default, rename = "releasedAt")]
    pub released_at: Option<NaiveDate>,
}

/// Cover image extracted from the file part
#[derive(Debug, Clone)]
pub struct CoverUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Command to create a book
#[derive(Debug, Clone)]
pub struct CreateBookCommand {
    pub user_id: Uuid,
    pub fields: BookFields,
    pub cover: Option<CoverUpload>,
}

/// Response from creating a book
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookResponse {
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
}

/// Errors that can occur when creating a book
#[derive(Debug, thiserror::Error)]
pub enum CreateBookError {
    #[error("Title is required")]
    TitleRequired,

    #[error("excerpt is required")]
    ExcerptRequired,

    #[error("ISBN is required")]
    IsbnRequired,

    #[error("category is required")]
    CategoryRequired,

    #[error("subcategory is required")]
    SubcategoryRequired,

    #[error("releasedAt is required")]
    ReleasedAtRequired,

    #[error("Bookcover is required")]
    CoverRequired,

    #[error("{0} Title is already used")]
    DuplicateTitle(String),

    #[error("{0} already exists")]
    DuplicateIsbn(String),

    #[error("Failed to upload book cover: {0}")]
    Upload(anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Validated book fields plus the cover payload
#[derive(Debug)]
struct ValidatedBook {
    title: String,
    excerpt: String,
    isbn: String,
    category: String,
    subcategory: Vec<String>,
    released_at: NaiveDate,
    cover: CoverUpload,
}

impl CreateBookCommand {
    fn validate(self) -> Result<ValidatedBook, CreateBookError> {
        let title = self
            .fields
            .title
            .filter(|t| is_present(t))
            .ok_or(CreateBookError::TitleRequired)?;
        let excerpt = self
            .fields
            .excerpt
            .filter(|e| is_present(e))
            .ok_or(CreateBookError::ExcerptRequired)?;
        let isbn = self
            .fields
            .isbn
            .filter(|i| is_present(i))
            .ok_or(CreateBookError::IsbnRequired)?;
        let category = self
            .fields
            .category
            .filter(|c| is_present(c))
            .ok_or(CreateBookError::CategoryRequired)?;

        let subcategory: Vec<String> = self
            .fields
            .subcategory
            .map(SubcategoryInput::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if subcategory.is_empty() {
            return Err(CreateBookError::SubcategoryRequired);
        }

        let released_at = self
            .fields
            .released_at
            .ok_or(CreateBookError::ReleasedAtRequired)?;

        let cover = self.cover.ok_or(CreateBookError::CoverRequired)?;

        Ok(ValidatedBook {
            title: title.trim().to_string(),
            excerpt: excerpt.trim().to_string(),
            isbn: isbn.trim().to_string(),
            category: category.trim().to_string(),
            subcategory,
            released_at,
            cover,
        })
    }
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
    created_at: DateTime<Utc>,
}

/// Handler function for book creation
#[tracing::instrument(skip(pool, storage, command), fields(user_id = %command.user_id))]
pub async fn handle(
    pool: PgPool,
    storage: &Storage,
    command: CreateBookCommand,
) -> Result<CreateBookResponse, CreateBookError> {
    let user_id = command.user_id;
    let book = command.validate()?;

    let key = storage.cover_key(&book.cover.filename);
    let uploaded = storage
        .upload(&key, book.cover.data, book.cover.content_type)
        .await
        .map_err(CreateBookError::Upload)?;

    let inserted = sqlx::query_as::<_, BookRecord>(
        r#"
        INSERT INTO books (title, excerpt, user_id, isbn, category, subcategory, book_cover, released_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, excerpt, user_id, isbn, category, subcategory,
                  reviews, book_cover, released_at, created_at
        "#,
    )
    .bind(&book.title)
    .bind(&book.excerpt)
    .bind(user_id)
    .bind(&book.isbn)
    .bind(&book.category)
    .bind(&book.subcategory)
    .bind(&uploaded.url)
    .bind(book.released_at)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return match db_err.constraint() {
                    Some("books_title_key") => CreateBookError::DuplicateTitle(book.title.clone()),
                    Some("books_isbn_key") => CreateBookError::DuplicateIsbn(book.isbn.clone()),
                    _ => CreateBookError::Database(e),
                };
            }
        }
        CreateBookError::Database(e)
    });

    let record = match inserted {
        Ok(record) => record,
        Err(err) => {
            // The insert failed; remove the orphaned cover object.
            if let Err(cleanup_err) = storage.delete(&uploaded.key).await {
                tracing::warn!("Failed to clean up orphaned cover {}: {}", uploaded.key, cleanup_err);
            }
            return Err(err);
        },
    };

    tracing::info!(book_id = %record.id, "Book created");

    Ok(CreateBookResponse {
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
        created_at: record.created_at,
    })
}
