//! Bookshelf Server Library
//!
//! HTTP backend for a book catalog: user registration and login, book CRUD
//! with cover uploads, and book reviews.
//!
//! # Overview
//!
//! - **API Endpoints**: REST API returning a `{status, message, data?}`
//!   envelope on every response
//! - **Database**: PostgreSQL via SQLx, with soft-deleted records modeled as
//!   an explicit `record_state` lifecycle
//! - **Storage**: S3-compatible object storage for book cover images
//! - **Auth**: HS256 tokens issued at login, bcrypt-hashed passwords
//!
//! # Architecture
//!
//! Each resource is a vertical feature slice under [`features`]:
//!
//! - `commands/` - write operations (register, create, update, delete)
//! - `queries/` - read operations (get, list)
//! - `routes.rs` - HTTP route definitions and error-to-status mapping
//!
//! Commands and queries are plain data structures validated up front, with a
//! standalone async `handle` function carrying the business logic and SQL.

pub mod api;
pub mod auth;
pub mod config;
pub mod features;
pub mod middleware;
pub mod models;
pub mod storage;

// Re-export commonly used types
pub use api::response::{ApiError, ApiResponse, ApiResult};
