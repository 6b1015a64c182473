//! PostgreSQL repository implementations.
//!
//! - [`PgUrlRepository`] - URL record storage with short code uniqueness

pub mod pg_url_repository;

pub use pg_url_repository::PgUrlRepository;
