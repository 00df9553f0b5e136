//! HTTP request handlers (route handlers).
//!
//! Handlers stay thin: they extract request data, call into `keys` or
//! `services`, and shape the JSON response.

/// Service and database health
pub mod health;
/// API key administration and introspection
pub mod keys;
/// OwnTracks ingestion and location history
pub mod locations;
