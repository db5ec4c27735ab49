//! Gateway errors.

use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::domain::workflow::{Stage, WorkflowError};

/// Failure of a stage gateway or of applying its result.
///
/// `Clone` because one failure is shared by every coalesced caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// Pre-flight rejection; no service call was made.
    #[error("Unsupported file format for '{file_name}': only .csv and .xlsx files are accepted")]
    UnsupportedFormat { file_name: String },

    /// Ingestion service failure, upstream message verbatim.
    #[error("{0}")]
    Ingestion(String),

    #[error("{0}")]
    Exploration(String),

    #[error("{0}")]
    Prediction(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The workflow moved on while the call was pending.
    #[error("The {stage} result arrived after the workflow moved on and was discarded")]
    Superseded { stage: Stage },

    /// A different request for the stage is still running.
    #[error("A {stage} request with different input is already in progress")]
    InFlight { stage: Stage },

    /// The task running the call panicked or was cancelled.
    #[error("The {stage} call was aborted")]
    Aborted { stage: Stage },
}

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            GatewayError::Ingestion(_) => ErrorCode::IngestionFailed,
            GatewayError::Exploration(_) => ErrorCode::ExplorationFailed,
            GatewayError::Prediction(_) => ErrorCode::PredictionFailed,
            GatewayError::Workflow(err) => err.code(),
            GatewayError::Superseded { .. } => ErrorCode::StaleResponse,
            GatewayError::InFlight { .. } => ErrorCode::StageInFlight,
            GatewayError::Aborted { .. } => ErrorCode::InternalError,
        }
    }

    /// True for failures of the external service itself.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GatewayError::Ingestion(_) | GatewayError::Exploration(_) | GatewayError::Prediction(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_messages_pass_through_unchanged() {
        let err = GatewayError::Ingestion("Missing columns: OverTime".to_string());
        assert_eq!(err.to_string(), "Missing columns: OverTime");
        assert_eq!(err.code(), ErrorCode::IngestionFailed);
        assert!(err.is_upstream());
    }

    #[test]
    fn workflow_errors_keep_their_code() {
        let err: GatewayError = WorkflowError::NothingRetained(Stage::Explore).into();
        assert_eq!(err.code(), ErrorCode::NothingRetained);
        assert!(!err.is_upstream());
    }

    #[test]
    fn superseded_maps_to_stale_response() {
        let err = GatewayError::Superseded {
            stage: Stage::Predict,
        };
        assert_eq!(err.code(), ErrorCode::StaleResponse);
    }

    #[test]
    fn in_flight_names_the_stage() {
        let err = GatewayError::InFlight {
            stage: Stage::Upload,
        };
        assert_eq!(err.code(), ErrorCode::StageInFlight);
        assert_eq!(
            err.to_string(),
            "A Upload request with different input is already in progress"
        );
    }
}
