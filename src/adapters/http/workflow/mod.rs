//! Workflow HTTP adapter - JSON API over `WorkflowSession`.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, HealthResponse, PredictionView, RiskTableParams};
pub use handlers::{WorkflowApiError, WorkflowAppState};
pub use routes::workflow_routes;
