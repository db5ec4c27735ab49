//! Per-bucket guidance shown when inspecting a single record.

use serde::Serialize;

use super::{Classification, EmployeeRecord, RecordClassifier, RiskBucket};

/// Explanation and recommended HR actions for one risk bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskGuidance {
    pub explanation: &'static str,
    pub recommendations: &'static [&'static str],
}

impl RiskGuidance {
    pub fn for_bucket(bucket: RiskBucket) -> Self {
        match bucket {
            RiskBucket::High => Self {
                explanation: "This employee shows elevated attrition risk based on multiple \
                    factors including tenure, workload patterns, and compensation. HR should \
                    prioritize engagement and retention conversations.",
                recommendations: &[
                    "Urgent: Priority engagement meeting",
                    "Conduct compensation review",
                    "Discuss career advancement plans",
                    "Implement flexible work arrangements if applicable",
                    "Regular monitoring over next 3 months",
                ],
            },
            RiskBucket::Medium => Self {
                explanation: "This employee shows moderate attrition risk. Monitoring and \
                    periodic engagement checks are recommended to identify any underlying \
                    concerns.",
                recommendations: &[
                    "Schedule periodic check-ins",
                    "Offer professional development",
                    "Strengthen team relationships",
                    "Quarterly satisfaction reviews",
                ],
            },
            RiskBucket::Low => Self {
                explanation: "This employee shows low attrition risk based on current data. \
                    Continue regular engagement practices to maintain satisfaction.",
                recommendations: &[
                    "Maintain current engagement level",
                    "Recognition programs",
                    "Continue development opportunities",
                ],
            },
        }
    }
}

/// Everything the Detail stage shows about the selected record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    pub record: EmployeeRecord,
    pub classification: Classification,
    pub guidance: RiskGuidance,
}

impl RecordDetail {
    pub fn of(record: &EmployeeRecord) -> Self {
        let classification = RecordClassifier::classify_record(record);
        let guidance = RiskGuidance::for_bucket(classification.bucket);
        Self {
            record: record.clone(),
            classification,
            guidance,
        }
    }
}
