//! Data models for the HTTP surface and the `locations` table.

/// API key request/response bodies
pub mod api_key;
/// Location pings and history responses
pub mod location;
