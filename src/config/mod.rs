//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ATTRITION_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use attrition_sherpa::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Scoring backend at {}", config.services.base_url);
//! ```

mod error;
mod server;
mod services;

pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use services::ServicesConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// development setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Attrition backend (ingestion, exploration, scoring)
    #[serde(default)]
    pub services: ServicesConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ATTRITION` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ATTRITION__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ATTRITION__SERVICES__BASE_URL=...` -> `services.base_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ATTRITION")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.services.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; tests touching them run one at a time.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("ATTRITION__SERVER__PORT");
        env::remove_var("ATTRITION__SERVER__ENVIRONMENT");
        env::remove_var("ATTRITION__SERVER__LOG_JSON");
        env::remove_var("ATTRITION__SERVICES__BASE_URL");
        env::remove_var("ATTRITION__SERVICES__TIMEOUT_SECS");
    }

    #[test]
    fn test_load_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.services.base_url, "http://localhost:8000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("ATTRITION__SERVER__PORT", "3000");
        env::set_var("ATTRITION__SERVER__LOG_JSON", "true");
        env::set_var("ATTRITION__SERVICES__BASE_URL", "http://scoring:8000");
        env::set_var("ATTRITION__SERVICES__TIMEOUT_SECS", "45");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.server.log_json);
        assert_eq!(config.services.base_url, "http://scoring:8000");
        assert_eq!(config.services.timeout_secs, 45);
    }

    #[test]
    fn test_production_requires_https_backend() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("ATTRITION__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(config.validate(), Err(ValidationError::ServiceUrlMustBeHttps));
    }
}
