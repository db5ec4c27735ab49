//! Attrition backend adapter - reqwest client for `/upload`, `/explore`
//! and `/predict`.

mod client;
mod wire;

pub use client::{AttritionApiClient, AttritionApiConfig};
