//! JPQL.Next diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the
//! expression builder and its tooling: error codes, source spans and
//! locations, and diagnostic reporting.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for JPQL.Next operations
pub type Result<T> = std::result::Result<T, JpqlError>;
