//! Risk view - the interactive table over scored records.
//!
//! Pure and synchronous; safe to call from any number of readers. Never
//! advances the workflow.

mod filter;
mod view;

pub use filter::{BucketFilter, DepartmentFilter, FilterSpec, ALL};
pub use view::{HighestRisk, RiskTable, RiskView, VisibleStats};
