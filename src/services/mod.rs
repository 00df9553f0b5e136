//! Business logic services.
//!
//! Services hold the database access for the location data path. API key
//! logic lives in [`crate::keys`].

pub mod location_service;
