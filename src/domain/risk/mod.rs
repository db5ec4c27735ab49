//! Risk module - scored records and their classification.
//!
//! `RecordClassifier` is the only place that turns a probability into a
//! bucket or a list of risk factors.

mod bucket;
mod classifier;
mod guidance;
mod record;
mod summary;

pub use bucket::{RiskBucket, HIGH_THRESHOLD, MEDIUM_THRESHOLD};
pub use classifier::{Classification, RecordClassifier, CRITICAL_THRESHOLD};
pub use guidance::{RecordDetail, RiskGuidance};
pub use record::{DriverAttributes, EmployeeRecord};
pub use summary::{BucketCounts, RiskSummary};
