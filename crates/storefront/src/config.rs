//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CLOTHIFY_CATALOG_URL` - URL of the remote product catalog (JSON array)
//!
//! ## Optional
//! - `CLOTHIFY_DATABASE_URL` - `SQLite` URL for the durable key-value store
//!   (default: `sqlite://clothify.db?mode=rwc`)
//! - `CLOTHIFY_FETCH_RETRIES` - extra catalog fetch attempts after the first
//!   failure (default: 2)
//! - `CLOTHIFY_FETCH_TIMEOUT_SECS` - per-request catalog fetch timeout
//!   (default: 10)

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote catalog source URL.
    pub catalog_url: String,
    /// `SQLite` URL backing the durable key-value store.
    pub database_url: String,
    /// Extra catalog fetch attempts after the first failure.
    pub fetch_retries: u32,
    /// Per-request catalog fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_url = get_required_env("CLOTHIFY_CATALOG_URL")?;
        let database_url =
            get_env_or_default("CLOTHIFY_DATABASE_URL", "sqlite://clothify.db?mode=rwc");
        let fetch_retries = parse_env_or_default("CLOTHIFY_FETCH_RETRIES", 2)?;
        let fetch_timeout_secs = parse_env_or_default("CLOTHIFY_FETCH_TIMEOUT_SECS", 10)?;

        Ok(Self {
            catalog_url,
            database_url,
            fetch_retries,
            fetch_timeout_secs,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable into a number, with a default when unset.
fn parse_env_or_default<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_or_default_uses_default_when_unset() {
        let value: u32 = parse_env_or_default("CLOTHIFY_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("CLOTHIFY_CATALOG_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: CLOTHIFY_CATALOG_URL"
        );
    }
}
