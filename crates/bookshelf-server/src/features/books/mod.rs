//! Books feature
//!
//! Catalog CRUD. Creation is a multipart request (book fields plus a cover
//! image that is uploaded to object storage); mutation is owner-only; delete
//! is a soft delete via the record lifecycle state.

pub mod commands;
pub mod queries;
pub mod routes;
