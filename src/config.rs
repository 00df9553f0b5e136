//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct,
//! then checks the values that have security consequences.

use serde::Deserialize;

use crate::keys::hasher::{DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, MIN_ITERATIONS, min_memory_kib};

/// Longest accepted key lifetime (100 years).
pub const MAX_EXPIRATION_DAYS: u32 = 36_500;

/// Shortest accepted admin token.
pub const MIN_ADMIN_TOKEN_LEN: usize = 16;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): PostgreSQL connection string. When absent it is
///   assembled from `DB_USER`, `DB_PASSWORD`, `DB_HOST`, `DB_PORT` and `DB_NAME`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `API_KEY_EXPIRATION_DAYS` (optional): key lifetime, 0 = never expires, defaults to 365
/// - `KEY_HASH_MEMORY_KIB` / `KEY_HASH_ITERATIONS` (optional): Argon2 work factor
/// - `ADMIN_TOKEN` (required): bearer token for the key administration routes
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: Option<String>,

    #[serde(default = "default_db_user")]
    pub db_user: String,

    pub db_password: Option<String>,

    #[serde(default = "default_db_host")]
    pub db_host: String,

    #[serde(default = "default_db_port")]
    pub db_port: u16,

    #[serde(default = "default_db_name")]
    pub db_name: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_expiration_days")]
    pub api_key_expiration_days: u32,

    #[serde(default = "default_hash_memory")]
    pub key_hash_memory_kib: u32,

    #[serde(default = "default_hash_iterations")]
    pub key_hash_iterations: u32,

    pub admin_token: String,
}

fn default_db_user() -> String {
    "locations".to_string()
}

fn default_db_host() -> String {
    "db".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "locations".to_string()
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_expiration_days() -> u32 {
    365
}

fn default_hash_memory() -> u32 {
    DEFAULT_MEMORY_KIB
}

fn default_hash_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

/// Configuration could not be loaded or is unsafe to run with.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),

    /// Every problem found, so they can all be fixed in one go.
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and validates them.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., ADMIN_TOKEN)
    /// - Environment variable values cannot be parsed into expected types
    /// - Values fail validation (see [`Config::validate`])
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = envy::from_iter::<_, Config>(vars)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every security-relevant setting and fill in `database_url`.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.is_none() {
            match self.db_password.as_deref().filter(|p| !p.is_empty()) {
                Some(password) => match self.assemble_database_url(password) {
                    Ok(url) => self.database_url = Some(url),
                    Err(problem) => errors.push(problem),
                },
                None => errors.push("DATABASE_URL or DB_PASSWORD is required".to_string()),
            }
        }

        if self.api_key_expiration_days > MAX_EXPIRATION_DAYS {
            errors.push(format!(
                "API_KEY_EXPIRATION_DAYS must be at most {MAX_EXPIRATION_DAYS}"
            ));
        }
        if self.key_hash_iterations < MIN_ITERATIONS {
            errors.push(format!("KEY_HASH_ITERATIONS must be at least {MIN_ITERATIONS}"));
        }
        let min_memory = min_memory_kib(self.key_hash_iterations);
        if self.key_hash_memory_kib < min_memory {
            errors.push(format!(
                "KEY_HASH_MEMORY_KIB must be at least {min_memory} with {} iterations",
                self.key_hash_iterations
            ));
        }
        if self.admin_token.chars().count() < MIN_ADMIN_TOKEN_LEN {
            errors.push(format!(
                "ADMIN_TOKEN must be at least {MIN_ADMIN_TOKEN_LEN} characters"
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Build a connection URL from the `DB_*` parts, percent-encoding the credentials.
    fn assemble_database_url(&self, password: &str) -> Result<String, String> {
        let mut url = url::Url::parse(&format!(
            "postgres://{}:{}/{}",
            self.db_host, self.db_port, self.db_name
        ))
        .map_err(|e| format!("DB_HOST/DB_PORT/DB_NAME do not form a valid URL: {e}"))?;

        url.set_username(&self.db_user)
            .and_then(|()| url.set_password(Some(password)))
            .map_err(|()| "DB_USER/DB_PASSWORD cannot be used in a URL".to_string())?;

        Ok(url.to_string())
    }

    /// The database URL; `validate` guarantees it is set.
    pub fn database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or_default()
    }

    /// Database URL with the password masked, for logging.
    pub fn redacted_database_url(&self) -> String {
        let raw = self.database_url();
        match url::Url::parse(raw) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    // Only fails for URLs that cannot carry credentials
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            }
            Err(_) => "<unparseable database url>".to_string(),
        }
    }
}
