//! Bookshelf Common Library
//!
//! Shared infrastructure for the Bookshelf workspace. Currently this is the
//! logging setup used by every binary; anything else that needs to be shared
//! between members lands here.
//!
//! # Example
//!
//! ```no_run
//! use bookshelf_common::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env().unwrap_or_default();
//! init_logging(&config).unwrap();
//! ```

pub mod logging;
