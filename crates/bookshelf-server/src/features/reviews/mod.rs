//! Reviews feature
//!
//! Reviews hang off a book and keep the book's denormalized `reviews` count
//! in step: every insert or soft delete runs in one transaction with the
//! counter update.

pub mod commands;
pub mod routes;
