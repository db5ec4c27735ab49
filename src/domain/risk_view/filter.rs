//! Filter specification for the risk table.

use serde::{Deserialize, Serialize};

use crate::domain::risk::{EmployeeRecord, RiskBucket};

/// Label used by clients for "no restriction".
pub const ALL: &str = "All";

/// Department restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepartmentFilter {
    #[default]
    All,
    Only(String),
}

impl DepartmentFilter {
    /// Parses a client value; missing, empty or "All" means no restriction.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => DepartmentFilter::All,
            Some(v) if v.eq_ignore_ascii_case(ALL) => DepartmentFilter::All,
            Some(v) => DepartmentFilter::Only(v.to_string()),
        }
    }

    fn matches(&self, department: &str) -> bool {
        match self {
            DepartmentFilter::All => true,
            DepartmentFilter::Only(wanted) => wanted == department,
        }
    }
}

/// Risk bucket restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketFilter {
    #[default]
    All,
    Only(RiskBucket),
}

impl BucketFilter {
    fn matches(&self, bucket: RiskBucket) -> bool {
        match self {
            BucketFilter::All => true,
            BucketFilter::Only(wanted) => *wanted == bucket,
        }
    }
}

/// Conjunctive filter over scored records.
///
/// Owned by the view layer; never stored in the workflow state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub department: DepartmentFilter,
    pub risk_bucket: BucketFilter,
    pub search_term: String,
}

impl FilterSpec {
    /// A filter that lets every record through.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = DepartmentFilter::Only(department.into());
        self
    }

    pub fn with_bucket(mut self, bucket: RiskBucket) -> Self {
        self.risk_bucket = BucketFilter::Only(bucket);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// True if the record passes every clause.
    pub fn matches(&self, record: &EmployeeRecord) -> bool {
        self.department.matches(&record.department)
            && self.risk_bucket.matches(record.bucket())
            && self.matches_search(record)
    }

    fn matches_search(&self, record: &EmployeeRecord) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        [
            record.employee_id.as_str(),
            record.department.as_str(),
            record.job_role.as_str(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}
