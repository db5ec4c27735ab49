//! Application layer - stage gateways and the workflow session.
//!
//! Gateways perform the external calls; `WorkflowSession` serializes their
//! results into the `WorkflowEngine` and serves the read models.

pub mod gateways;
mod session;
mod views;

pub use gateways::{ExploreGateway, GatewayError, PredictGateway, UploadGateway};
pub use session::WorkflowSession;
pub use views::{RiskRow, RiskTableReport, WorkflowSnapshot};
