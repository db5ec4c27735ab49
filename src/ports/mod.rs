//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the workflow and the outside world. Adapters implement these ports.
//!
//! ## Service Ports
//!
//! - `IngestionService` - Parses an uploaded CSV/XLSX dataset
//! - `ExplorationService` - Aggregates and chart series over the dataset
//! - `ScoringService` - Per-employee attrition probabilities

mod exploration_service;
mod ingestion_service;
mod scoring_service;
mod service_error;

pub use exploration_service::{ExplorationReport, ExplorationService, RawCategorical, RawSeries};
pub use ingestion_service::{IngestionReport, IngestionService, UploadFile};
pub use scoring_service::{ScoringReport, ScoringService};
pub use service_error::ServiceError;
