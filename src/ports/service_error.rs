//! Errors shared by the external service ports.

use thiserror::Error;

/// Failure reported by an ingestion, exploration or scoring service.
///
/// `Clone` so a single failure can be handed to every coalesced caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    ///
    /// `detail` is the service's own message and is shown to the user as is.
    #[error("{detail}")]
    Rejected {
        /// HTTP status code returned by the service.
        status: u16,
        /// Upstream message.
        detail: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Failed to parse the service response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ServiceError {
    /// Creates a rejection with the upstream status and message.
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        ServiceError::Rejected {
            status,
            detail: detail.into(),
        }
    }
}
