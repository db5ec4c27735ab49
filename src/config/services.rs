//! Attrition backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Location and limits of the ingestion, exploration and scoring services
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// Base URL of the attrition backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Largest accepted upload body in bytes
    #[serde(default = "default_upload_limit")]
    pub upload_limit_bytes: usize,

    /// Serve the built-in sample instead of calling the backend
    #[serde(default)]
    pub mock: bool,
}

impl ServicesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate service configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let url = self.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ValidationError::InvalidServiceUrl(self.base_url.clone()));
        }
        if *environment == Environment::Production && !url.starts_with("https://") {
            return Err(ValidationError::ServiceUrlMustBeHttps);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidServiceTimeout);
        }
        if self.upload_limit_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            upload_limit_bytes: default_upload_limit(),
            mock: false,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_upload_limit() -> usize {
    50 * 1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_in_development() {
        let config = ServicesConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn production_requires_https() {
        let config = ServicesConfig::default();
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::ServiceUrlMustBeHttps)
        );
    }

    #[test]
    fn rejects_url_without_scheme() {
        let config = ServicesConfig {
            base_url: "localhost:8000".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidServiceUrl(_))
        ));
    }

    #[test]
    fn rejects_zero_upload_limit() {
        let config = ServicesConfig {
            upload_limit_bytes: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidUploadLimit)
        );
    }
}
