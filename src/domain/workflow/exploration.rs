//! Explore stage payload: aggregates and chart series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Labels with one count per label, ready to chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl ChartSeries {
    /// Creates a series, rejecting label/value count mismatches.
    pub fn new(labels: Vec<String>, values: Vec<u64>) -> Result<Self, ValidationError> {
        if labels.len() != values.len() {
            return Err(ValidationError::invalid_format(
                "chart",
                format!("{} labels but {} values", labels.len(), values.len()),
            ));
        }
        Ok(Self { labels, values })
    }

    /// Label/value pairs in order.
    pub fn points(&self) -> impl Iterator<Item = (&str, u64)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }
}

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// Value counts for a categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub unique: u64,
    pub series: ChartSeries,
}

/// Everything the Explore stage produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationSummary {
    pub total_rows: u64,
    pub total_columns: u64,
    pub missing_values: BTreeMap<String, u64>,
    pub charts: BTreeMap<String, ChartSeries>,
    pub numerical: BTreeMap<String, NumericSummary>,
    pub categorical: BTreeMap<String, CategoricalSummary>,
}

impl ExplorationSummary {
    /// Looks up a chart by name (e.g. `department`, `age_distribution`).
    pub fn chart(&self, name: &str) -> Option<&ChartSeries> {
        self.charts.get(name)
    }
}
