//! Location Logger
//!
//! A REST service that receives GPS pings from OwnTracks clients, stores them in
//! PostgreSQL, and serves them back to holders of an API key. Operators issue and
//! revoke those keys through admin endpoints.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: API keys, stored as an 8-character lookup prefix plus an
//!   Argon2id hash; see [`keys`]
//! - **Format**: JSON requests/responses

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod keys;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
