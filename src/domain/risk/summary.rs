//! Whole-dataset risk summary produced by the scoring pass.

use serde::{Deserialize, Serialize};

use super::{EmployeeRecord, RiskBucket};

/// Count of records per risk bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl BucketCounts {
    /// Tallies records by their classified bucket.
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a EmployeeRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.add(record.bucket());
        }
        counts
    }

    pub fn add(&mut self, bucket: RiskBucket) {
        match bucket {
            RiskBucket::Low => self.low += 1,
            RiskBucket::Medium => self.medium += 1,
            RiskBucket::High => self.high += 1,
        }
    }

    pub fn get(&self, bucket: RiskBucket) -> usize {
        match bucket {
            RiskBucket::Low => self.low,
            RiskBucket::Medium => self.medium,
            RiskBucket::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// Summary of a scored dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub total_employees: usize,
    pub low_risk: usize,
    pub medium_risk: usize,
    pub high_risk: usize,
    /// Mean probability; absent when there are no records.
    pub average_probability: Option<f64>,
}

impl RiskSummary {
    /// Derives the summary from the records themselves.
    pub fn from_records(records: &[EmployeeRecord]) -> Self {
        let counts = BucketCounts::tally(records);
        let average_probability = if records.is_empty() {
            None
        } else {
            let sum: f64 = records.iter().map(|r| r.attrition_probability).sum();
            Some(sum / records.len() as f64)
        };

        Self {
            total_employees: records.len(),
            low_risk: counts.low,
            medium_risk: counts.medium,
            high_risk: counts.high,
            average_probability,
        }
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            low: self.low_risk,
            medium: self.medium_risk,
            high: self.high_risk,
        }
    }
}
