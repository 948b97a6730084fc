//! Feature modules implementing the Bookshelf API
//!
//! Each resource is a vertical slice with its own commands (writes), queries
//! (reads), and routes:
//!
//! - **users**: registration and login
//! - **books**: catalog CRUD with cover uploads, owner-only mutation
//! - **reviews**: per-book reviews with a denormalized counter on the book

pub mod books;
pub mod reviews;
pub mod shared;
pub mod users;

use axum::Router;

use crate::auth::TokenService;
use crate::storage::Storage;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// S3-compatible storage for cover images
    pub storage: Storage,
    /// Login token issue/verify
    pub tokens: TokenService,
}

/// Creates the main API router with all feature routes mounted
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .merge(users::routes::user_routes())
        .merge(books::routes::book_routes())
        .merge(reviews::routes::review_routes())
        .with_state(state)
}
