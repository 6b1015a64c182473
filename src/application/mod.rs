//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating the store, the
//! cache and validation rules, and provides a clean API for HTTP handlers.
//!
//! - [`services::resolution_service::ResolutionService`] - Short code creation, lookup and mutation
//! - [`access_worker`] - Background access counting

pub mod access_worker;
pub mod services;
