//! Predict stage payload: the scored record set.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::foundation::{EmployeeId, ValidationError};
use crate::domain::risk::{EmployeeRecord, RiskSummary};

/// Scored employees for the whole dataset.
///
/// Never empty, and every probability is finite and within 0-100.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredDataset {
    records: Vec<EmployeeRecord>,
    scored_at: DateTime<Utc>,
}

impl ScoredDataset {
    /// Validates and wraps a scoring result. All-or-nothing: one bad
    /// probability rejects the whole set.
    pub fn new(records: Vec<EmployeeRecord>) -> Result<Self, ValidationError> {
        if records.is_empty() {
            return Err(ValidationError::empty_field("predictions"));
        }
        if let Some(bad) = records
            .iter()
            .find(|r| !(0.0..=100.0).contains(&r.attrition_probability))
        {
            return Err(ValidationError::out_of_range(
                format!("attrition_probability[{}]", bad.employee_id),
                0.0,
                100.0,
                bad.attrition_probability,
            ));
        }

        Ok(Self {
            records,
            scored_at: Utc::now(),
        })
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn scored_at(&self) -> DateTime<Utc> {
        self.scored_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Summary derived through the classifier.
    pub fn summary(&self) -> RiskSummary {
        RiskSummary::from_records(&self.records)
    }

    pub fn find(&self, id: &EmployeeId) -> Option<&EmployeeRecord> {
        self.records.iter().find(|r| &r.employee_id == id)
    }

    pub fn contains(&self, id: &EmployeeId) -> bool {
        self.find(id).is_some()
    }
}
