//! Book API routes
//!
//! - `POST /books` - Create a book (multipart, token required)
//! - `GET /books` - List books with optional filters
//! - `GET /books/:bookId` - Get a book with its reviews
//! - `PUT /books/:bookId` - Update a book (owner only)
//! - `DELETE /books/:bookId` - Soft-delete a book (owner only)

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::api::extract::ApiJson;
use crate::api::response::{ApiError, ApiResponse};
use crate::auth::AuthUser;
use crate::features::FeatureState;

use super::commands::{
    create::{BookFields, CoverUpload},
    CreateBookCommand, CreateBookError, DeleteBookCommand, DeleteBookError, UpdateBookCommand,
    UpdateBookError, UpdateBookOutcome,
};
use super::queries::{GetBookError, GetBookQuery, ListBooksError, ListBooksQuery};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the books router with all routes configured
pub fn book_routes() -> Router<FeatureState> {
    Router::new()
        .route("/books", post(create_book))
        .route("/books", get(list_books))
        .route("/books/:bookId", get(get_book))
        .route("/books/:bookId", put(update_book))
        .route("/books/:bookId", delete(delete_book))
}

// ============================================================================
// Multipart Parsing
// ============================================================================

const JSON_FIELD: &str = "json";

/// Pulls the `json` part and the first file part out of the multipart body.
async fn parse_book_multipart(
    mut multipart: Multipart,
) -> Result<(BookFields, Option<CoverUpload>), ApiError> {
    let mut fields: Option<BookFields> = None;
    let mut cover: Option<CoverUpload> = None;

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {}", e)))?
    {
        let name = part.name().unwrap_or_default().to_string();

        if name == JSON_FIELD {
            let raw = part.text().await.map_err(|e| {
                ApiError::BadRequest(format!("Malformed multipart request: {}", e))
            })?;
            let parsed: BookFields = serde_json::from_str(&raw).map_err(|_| {
                ApiError::BadRequest(
                    "Invalid request parameters. Please provide book details".to_string(),
                )
            })?;
            fields = Some(parsed);
        } else if part.file_name().is_some() && cover.is_none() {
            let filename = part
                .file_name()
                .unwrap_or("cover")
                .to_string();
            let content_type = part.content_type().map(str::to_string);
            let data = part
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {}", e)))?
                .to_vec();
            cover = Some(CoverUpload {
                filename,
                content_type,
                data,
            });
        }
    }

    let fields = fields.ok_or_else(|| {
        ApiError::BadRequest("Invalid request parameters. Please provide book details".to_string())
    })?;

    Ok((fields, cover))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a book
///
/// # Response
///
/// - `201 Created` - Book created
/// - `400 Bad Request` - Validation error, duplicate title/ISBN, or bad body
/// - `401 Unauthorized` - Missing or invalid token
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.0))]
async fn create_book(
    State(state): State<FeatureState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (fields, cover) = parse_book_multipart(multipart).await?;

    let command = CreateBookCommand {
        user_id: user.0,
        fields,
        cover,
    };

    let response = super::commands::create::handle(state.db, &state.storage, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Success", response)),
    )
        .into_response())
}

/// Update a book (owner only)
///
/// # Response
///
/// - `200 OK` - Book updated, or nothing to change
/// - `400 Bad Request` - Bad id or duplicate title/ISBN
/// - `403 Forbidden` - Caller does not own the book
/// - `404 Not Found` - Book missing or deleted
#[tracing::instrument(skip(state, command), fields(book_id = %book_id, user_id = %user.0))]
async fn update_book(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(book_id): Path<String>,
    ApiJson(mut command): ApiJson<UpdateBookCommand>,
) -> Result<Response, ApiError> {
    command.book_id = book_id;
    command.user_id = user.0;

    let outcome = super::commands::update::handle(state.db, command).await?;

    let response = match outcome {
        UpdateBookOutcome::Updated(book) => {
            Json(ApiResponse::success("Book updated successfully", book)).into_response()
        },
        UpdateBookOutcome::Unmodified => Json(ApiResponse::message_only(
            "No parameters passed. Book unmodified",
        ))
        .into_response(),
    };

    Ok(response)
}

/// Soft-delete a book (owner only)
///
/// # Response
///
/// - `200 OK` - Book deleted
/// - `403 Forbidden` - Caller does not own the book
/// - `404 Not Found` - Book missing or already deleted
#[tracing::instrument(skip(state), fields(book_id = %book_id, user_id = %user.0))]
async fn delete_book(
    State(state): State<FeatureState>,
    user: AuthUser,
    Path(book_id): Path<String>,
) -> Result<Response, ApiError> {
    let command = DeleteBookCommand {
        book_id,
        user_id: user.0,
    };

    super::commands::delete::handle(state.db, command).await?;

    Ok(Json(ApiResponse::message_only("Book deleted successfully")).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// List books (optional `userId`, `category`, `subcategory` filters)
///
/// # Response
///
/// - `200 OK` - Possibly-empty list of books
#[tracing::instrument(skip(state, query))]
async fn list_books(
    State(state): State<FeatureState>,
    Query(query): Query<ListBooksQuery>,
) -> Result<Response, ApiError> {
    let books = super::queries::list::handle(state.db, query).await?;

    Ok(Json(ApiResponse::success("Books list", books)).into_response())
}

/// Get a single book with its reviews
///
/// # Response
///
/// - `200 OK` - Book with reviews
/// - `400 Bad Request` - Malformed id
/// - `404 Not Found` - Book missing or deleted
#[tracing::instrument(skip(state), fields(book_id = %book_id))]
async fn get_book(
    State(state): State<FeatureState>,
    Path(book_id): Path<String>,
) -> Result<Response, ApiError> {
    let query = GetBookQuery { book_id };

    let response = super::queries::get::handle(state.db, query).await?;

    Ok(Json(ApiResponse::success("Books List", response)).into_response())
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<CreateBookError> for ApiError {
    fn from(err: CreateBookError) -> Self {
        match err {
            CreateBookError::TitleRequired
            | CreateBookError::ExcerptRequired
            | CreateBookError::IsbnRequired
            | CreateBookError::CategoryRequired
            | CreateBookError::SubcategoryRequired
            | CreateBookError::ReleasedAtRequired
            | CreateBookError::CoverRequired
            | CreateBookError::DuplicateTitle(_)
            | CreateBookError::DuplicateIsbn(_) => ApiError::BadRequest(err.to_string()),
            CreateBookError::Upload(e) => ApiError::Internal(e.to_string()),
            CreateBookError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<UpdateBookError> for ApiError {
    fn from(err: UpdateBookError) -> Self {
        match err {
            UpdateBookError::InvalidId(_)
            | UpdateBookError::DuplicateTitle(_)
            | UpdateBookError::DuplicateIsbn(_) => ApiError::BadRequest(err.to_string()),
            UpdateBookError::BookNotFound => ApiError::NotFound(err.to_string()),
            UpdateBookError::NotOwner => ApiError::Forbidden(err.to_string()),
            UpdateBookError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<DeleteBookError> for ApiError {
    fn from(err: DeleteBookError) -> Self {
        match err {
            DeleteBookError::InvalidId(_) => ApiError::BadRequest(err.to_string()),
            DeleteBookError::BookNotFound => ApiError::NotFound(err.to_string()),
            DeleteBookError::NotOwner => ApiError::Forbidden(err.to_string()),
            DeleteBookError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<GetBookError> for ApiError {
    fn from(err: GetBookError) -> Self {
        match err {
            GetBookError::InvalidId(_) => ApiError::BadRequest(err.to_string()),
            GetBookError::BookNotFound => ApiError::NotFound(err.to_string()),
            GetBookError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<ListBooksError> for ApiError {
    fn from(err: ListBooksError) -> Self {
        match err {
            ListBooksError::Database(e) => ApiError::Database(e),
        }
    }
}
