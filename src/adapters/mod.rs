//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the workflow to external systems:
//! - `attrition_api` - reqwest client for the ingestion/exploration/scoring backend
//! - `mock` - scripted in-process services for tests and offline runs
//! - `http` - axum API exposing the workflow

pub mod attrition_api;
pub mod http;
pub mod mock;

pub use attrition_api::{AttritionApiClient, AttritionApiConfig};
pub use mock::MockAttritionServices;
