//! RiskView - filtered, ranked and summarized risk table.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::foundation::EmployeeId;
use crate::domain::risk::{BucketCounts, EmployeeRecord, RecordClassifier};

use super::FilterSpec;

/// Statistics over the visible rows only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleStats {
    /// Number of visible rows.
    pub count: usize,
    /// Size of the unfiltered record set.
    pub total: usize,
    /// Visible rows with probability above 75.
    pub critical: usize,
    /// Mean probability of the visible rows; absent when nothing is visible.
    pub mean: Option<f64>,
    /// First row of the ranked sequence; absent when nothing is visible.
    pub highest: Option<HighestRisk>,
    pub buckets: BucketCounts,
}

/// The highest-ranked visible record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighestRisk {
    pub employee_id: EmployeeId,
    pub attrition_probability: f64,
}

/// Output of [`RiskView::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct RiskTable<'a> {
    pub rows: Vec<&'a EmployeeRecord>,
    pub stats: VisibleStats,
}

/// Pure view over a scored record set.
pub struct RiskView;

impl RiskView {
    /// Filters, ranks and summarizes `records`.
    ///
    /// Rows are ordered by probability descending, then identifier
    /// ascending, so the output order is fully determined by the input set.
    pub fn apply<'a>(records: &'a [EmployeeRecord], filter: &FilterSpec) -> RiskTable<'a> {
        let mut rows: Vec<&EmployeeRecord> = records.iter().filter(|r| filter.matches(r)).collect();
        rows.sort_by(|a, b| rank(a, b));

        let stats = Self::stats(&rows, records.len());
        RiskTable { rows, stats }
    }

    /// Distinct departments in first-seen order.
    pub fn departments(records: &[EmployeeRecord]) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for record in records {
            if !seen.iter().any(|d| d == &record.department) {
                seen.push(record.department.clone());
            }
        }
        seen
    }

    fn stats(rows: &[&EmployeeRecord], total: usize) -> VisibleStats {
        let count = rows.len();
        let critical = rows
            .iter()
            .filter(|r| RecordClassifier::is_critical(r.attrition_probability))
            .count();
        let mean = if count == 0 {
            None
        } else {
            let sum: f64 = rows.iter().map(|r| r.attrition_probability).sum();
            Some(sum / count as f64)
        };
        let highest = rows.first().map(|r| HighestRisk {
            employee_id: r.employee_id.clone(),
            attrition_probability: r.attrition_probability,
        });

        VisibleStats {
            count,
            total,
            critical,
            mean,
            highest,
            buckets: BucketCounts::tally(rows.iter().copied()),
        }
    }
}

fn rank(a: &EmployeeRecord, b: &EmployeeRecord) -> Ordering {
    b.attrition_probability
        .total_cmp(&a.attrition_probability)
        .then_with(|| a.employee_id.cmp(&b.employee_id))
}
