//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, errors, state machine trait)
//! - `risk` - Scored employee records, risk buckets and guidance
//! - `risk_view` - Filtering, ranking and statistics over scored records
//! - `workflow` - Stage progression and stage payloads

pub mod foundation;
pub mod risk;
pub mod risk_view;
pub mod workflow;
