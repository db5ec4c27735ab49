//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the state machine trait, and error types
//! that form the vocabulary of the attrition workflow domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{EmployeeId, SessionId};
pub use state_machine::StateMachine;
