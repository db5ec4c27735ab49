//! Stage gateways - one external call per stage, validated before use.
//!
//! A gateway never touches the engine. It returns a future yielding the
//! stage payload; `WorkflowSession` decides whether the result may still be
//! applied.

mod error;
mod explore;
mod predict;
mod upload;

pub use error::GatewayError;
pub use explore::ExploreGateway;
pub use predict::PredictGateway;
pub use upload::UploadGateway;
