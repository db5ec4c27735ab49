//! Exploration Service Port - aggregates over the ingested dataset.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::workflow::NumericSummary;

use super::ServiceError;

/// Port for the exploration service.
///
/// Operates on whatever dataset the ingestion service currently holds.
#[async_trait]
pub trait ExplorationService: Send + Sync {
    async fn explore(&self) -> Result<ExplorationReport, ServiceError>;
}

/// Labels and values exactly as the service sent them (not yet checked).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

/// Value counts for one categorical column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCategorical {
    pub unique: u64,
    pub series: RawSeries,
}

/// Result of a successful exploration call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorationReport {
    pub total_rows: u64,
    pub total_columns: u64,
    pub missing_values: BTreeMap<String, u64>,
    pub charts: BTreeMap<String, RawSeries>,
    pub numerical: BTreeMap<String, NumericSummary>,
    pub categorical: BTreeMap<String, RawCategorical>,
}
