//! Review API routes
//!
//! - `POST /books/:bookId/review` - Add a review to a book
//! - `PUT /books/:bookId/review/:reviewId` - Update a review
//! - `DELETE /books/:bookId/review/:reviewId` - Soft-delete a review

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, post, put},
    Json, Router,
};

use crate::api::extract::ApiJson;
use crate::api::response::{ApiError, ApiResponse};
use crate::features::FeatureState;

use super::commands::{
    CreateReviewCommand, CreateReviewError, DeleteReviewCommand, DeleteReviewError,
    UpdateReviewCommand, UpdateReviewError, UpdateReviewOutcome,
};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the reviews router with all routes configured
pub fn review_routes() -> Router<FeatureState> {
    Router::new()
        .route("/books/:bookId/review", post(create_review))
        .route("/books/:bookId/review/:reviewId", put(update_review))
        .route("/books/:bookId/review/:reviewId", delete(delete_review))
}

// ============================================================================
// Handlers
// ============================================================================

/// Add a review to a book
///
/// # Response
///
/// - `201 Created` - Review added, counter bumped
/// - `400 Bad Request` - Bad id or rating out of range
/// - `404 Not Found` - Book missing or deleted
#[tracing::instrument(skip(state, command), fields(book_id = %book_id))]
async fn create_review(
    State(state): State<FeatureState>,
    Path(book_id): Path<String>,
    ApiJson(mut command): ApiJson<CreateReviewCommand>,
) -> Result<Response, ApiError> {
    command.book_id = book_id;

    let response = super::commands::create::handle(state.db, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Review added successfully", response)),
    )
        .into_response())
}

/// Update a review
///
/// # Response
///
/// - `200 OK` - Review updated, or nothing to change
/// - `400 Bad Request` - Bad id or rating out of range
/// - `404 Not Found` - Book or review missing
#[tracing::instrument(skip(state, command), fields(book_id = %book_id, review_id = %review_id))]
async fn update_review(
    State(state): State<FeatureState>,
    Path((book_id, review_id)): Path<(String, String)>,
    ApiJson(mut command): ApiJson<UpdateReviewCommand>,
) -> Result<Response, ApiError> {
    command.book_id = book_id;
    command.review_id = review_id;

    let outcome = super::commands::update::handle(state.db, command).await?;

    let response = match outcome {
        UpdateReviewOutcome::Updated(review) => {
            Json(ApiResponse::success("Review updated successfully", review)).into_response()
        }
        UpdateReviewOutcome::Unmodified => Json(ApiResponse::message_only(
            "No parameters passed. Review unmodified",
        ))
        .into_response(),
    };

    Ok(response)
}

/// Soft-delete a review
///
/// # Response
///
/// - `200 OK` - Review deleted, counter decremented
/// - `400 Bad Request` - Bad id
/// - `404 Not Found` - Book or review missing
#[tracing::instrument(skip(state), fields(book_id = %book_id, review_id = %review_id))]
async fn delete_review(
    State(state): State<FeatureState>,
    Path((book_id, review_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let command = DeleteReviewCommand { book_id, review_id };

    super::commands::delete::handle(state.db, command).await?;

    Ok(Json(ApiResponse::message_only("Review deleted successfully")).into_response())
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<CreateReviewError> for ApiError {
    fn from(err: CreateReviewError) -> Self {
        match err {
            CreateReviewError::InvalidId(_) | CreateReviewError::Rating(_) => {
                ApiError::BadRequest(err.to_string())
            },
            CreateReviewError::BookNotFound => ApiError::NotFound(err.to_string()),
            CreateReviewError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<UpdateReviewError> for ApiError {
    fn from(err: UpdateReviewError) -> Self {
        match err {
            UpdateReviewError::InvalidId(_) | UpdateReviewError::Rating(_) => {
                ApiError::BadRequest(err.to_string())
            },
            UpdateReviewError::BookNotFound | UpdateReviewError::ReviewNotFound => {
                ApiError::NotFound(err.to_string())
            },
            UpdateReviewError::Database(e) => ApiError::Database(e),
        }
    }
}

impl From<DeleteReviewError> for ApiError {
    fn from(err: DeleteReviewError) -> Self {
        match err {
            DeleteReviewError::InvalidId(_) => ApiError::BadRequest(err.to_string()),
            DeleteReviewError::BookNotFound | DeleteReviewError::ReviewNotFound => {
                ApiError::NotFound(err.to_string())
            },
            DeleteReviewError::Database(e) => ApiError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_structure() {
        let router = review_routes();
        assert!(format!("{:?}", router).contains("Router"));
    }

    #[test]
    fn test_rating_error_maps_to_bad_request() {
        let err: ApiError = CreateReviewError::Rating(
            crate::features::shared::validation::RatingValidationError::OutOfRange,
        )
        .into();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "rating should be in a range 1-5"));
    }

    #[test]
    fn test_missing_review_maps_to_not_found() {
        let err: ApiError = DeleteReviewError::ReviewNotFound.into();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "Review not found"));
    }
}
