//! Request and response bodies for the workflow API.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EmployeeId, ErrorCode, ValidationError};
use crate::domain::risk::{RiskBucket, RiskSummary};
use crate::domain::risk_view::{BucketFilter, DepartmentFilter, FilterSpec, ALL};
use crate::domain::workflow::{ScoredDataset, Stage};

/// Standard error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Query for `POST /api/workflow/upload`.
#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub file_name: String,
}

/// Query for `GET /api/workflow/risk-table`.
#[derive(Debug, Default, Deserialize)]
pub struct RiskTableParams {
    pub department: Option<String>,
    /// `All`, `Low`, `Medium` or `High`.
    pub risk: Option<String>,
    pub search: Option<String>,
}

impl RiskTableParams {
    pub fn into_filter(self) -> Result<FilterSpec, ValidationError> {
        let risk_bucket = match self.risk.as_deref().map(str::trim) {
            None | Some("") => BucketFilter::All,
            Some(v) if v.eq_ignore_ascii_case(ALL) => BucketFilter::All,
            Some(v) => BucketFilter::Only(RiskBucket::from_str(v)?),
        };
        Ok(FilterSpec {
            department: DepartmentFilter::parse(self.department.as_deref()),
            risk_bucket,
            search_term: self.search.unwrap_or_default(),
        })
    }
}

/// Body for selecting or opening a record.
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub employee_id: String,
}

impl SelectionRequest {
    pub fn employee_id(self) -> Result<EmployeeId, ValidationError> {
        EmployeeId::new(self.employee_id)
    }
}

/// Body for `POST /api/workflow/retreat`.
#[derive(Debug, Deserialize)]
pub struct RetreatRequest {
    pub stage: String,
}

impl RetreatRequest {
    pub fn stage(&self) -> Result<Stage, ValidationError> {
        Stage::from_str(&self.stage)
    }
}

/// Response of `POST /api/workflow/predict`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionView {
    pub summary: RiskSummary,
    pub scored_at: DateTime<Utc>,
}

impl From<&ScoredDataset> for PredictionView {
    fn from(scored: &ScoredDataset) -> Self {
        Self {
            summary: scored.summary(),
            scored_at: scored.scored_at(),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stage: Stage,
}
