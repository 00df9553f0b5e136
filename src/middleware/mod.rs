//! HTTP middleware components.
//!
//! Middleware run before route handlers and short-circuit requests that
//! fail authentication.

/// API key and admin token authentication
pub mod auth;
