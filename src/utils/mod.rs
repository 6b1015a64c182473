//! Utility functions for code generation, URL processing, and database errors.
//!
//! - [`code_generator`] - Secure short code generation
//! - [`url_normalizer`] - URL normalization and validation
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod url_normalizer;
