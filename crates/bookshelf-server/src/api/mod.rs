//! API response envelope, error types and request extractors

pub mod extract;
pub mod response;
