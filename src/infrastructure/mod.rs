//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the domain contracts:
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod persistence;
