//! Workflow engine errors.

use std::fmt;

use thiserror::Error;

use crate::domain::foundation::{EmployeeId, ErrorCode};

use super::Stage;

/// The transition a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advance(Stage),
    Retreat(Stage),
    Forward,
    Select,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Advance(stage) => write!(f, "advance from {}", stage),
            Transition::Retreat(stage) => write!(f, "retreat to {}", stage),
            Transition::Forward => write!(f, "move forward"),
            Transition::Select => write!(f, "select a record"),
        }
    }
}

/// Errors raised by the workflow engine.
///
/// `IllegalTransition` and `PayloadMismatch` are contract violations by the
/// caller, not user-facing conditions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("Illegal transition: cannot {attempted} while workflow is at {current}")]
    IllegalTransition { current: Stage, attempted: Transition },

    #[error("Stage {stage} expects a {expected} payload, got {actual}")]
    PayloadMismatch {
        stage: Stage,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Record {0} is not part of the scored dataset")]
    UnknownRecord(EmployeeId),

    #[error("No retained result for the {0} stage")]
    NothingRetained(Stage),

    #[error("The {0} stage has not produced its result yet")]
    StageUnavailable(Stage),
}

impl WorkflowError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WorkflowError::IllegalTransition { .. } => ErrorCode::IllegalTransition,
            WorkflowError::PayloadMismatch { .. } => ErrorCode::PayloadMismatch,
            WorkflowError::UnknownRecord(_) => ErrorCode::RecordNotFound,
            WorkflowError::NothingRetained(_) => ErrorCode::NothingRetained,
            WorkflowError::StageUnavailable(_) => ErrorCode::StageUnavailable,
        }
    }
}
