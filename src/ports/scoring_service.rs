//! Scoring Service Port - runs the attrition model over the ingested dataset.

use async_trait::async_trait;

use crate::domain::risk::{EmployeeRecord, RiskSummary};

use super::ServiceError;

/// Port for the scoring service.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Scores every employee of the ingested dataset.
    async fn score(&self) -> Result<ScoringReport, ServiceError>;
}

/// Result of a scoring call, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringReport {
    pub records: Vec<EmployeeRecord>,
    /// Summary computed by the service, if it sent one.
    pub summary: Option<RiskSummary>,
}
