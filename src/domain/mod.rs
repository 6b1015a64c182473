//! Domain layer containing business entities and store contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`errors`] - Store error taxonomy
//! - [`access_event`] - Access counting event model
//!
//! # Access Counting Flow
//!
//! 1. Redirect handler resolves the short code
//! 2. [`access_event::AccessEvent`] is sent to an async channel
//! 3. [`crate::application::access_worker::run_access_worker`] increments the counter
//! 4. The cached record is invalidated so the next read sees the new count

pub mod access_event;
pub mod entities;
pub mod errors;
pub mod repositories;
