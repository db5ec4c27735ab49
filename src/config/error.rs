//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid service base URL: {0}")]
    InvalidServiceUrl(String),

    #[error("Invalid service timeout")]
    InvalidServiceTimeout,

    #[error("Upload limit must be positive")]
    InvalidUploadLimit,

    #[error("Service base URL must use HTTPS in production")]
    ServiceUrlMustBeHttps,
}
