//! Upload stage payload.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of rows kept for the upload preview.
pub const PREVIEW_ROWS: usize = 5;

/// File formats the ingestion service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    Csv,
    Xlsx,
}

impl DatasetFormat {
    /// Detects the format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(DatasetFormat::Csv),
            "xlsx" => Some(DatasetFormat::Xlsx),
            _ => None,
        }
    }

    /// Rewrites the extension of `name` in this format's lower-case form.
    ///
    /// The ingestion service matches extensions case-sensitively, so
    /// `STAFF.XLSX` is sent as `STAFF.xlsx`.
    pub fn normalize_file_name(&self, name: &str) -> String {
        let stem = match name.rfind('.') {
            Some(dot) => &name[..dot],
            None => name,
        };
        format!("{}.{}", stem, self)
    }

    /// MIME type sent along with the upload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DatasetFormat::Csv => "text/csv",
            DatasetFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetFormat::Csv => write!(f, "csv"),
            DatasetFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// One preview row keyed by column name.
pub type PreviewRow = serde_json::Map<String, serde_json::Value>;

/// What the workflow knows about the uploaded dataset.
///
/// The rows themselves stay with the ingestion service; this is a handle
/// plus the facts shown on the upload screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetHandle {
    pub file_name: String,
    pub format: DatasetFormat,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub preview_rows: Vec<PreviewRow>,
    pub missing_value_counts: BTreeMap<String, u64>,
    pub uploaded_at: DateTime<Utc>,
}

impl DatasetHandle {
    /// True if any column reports missing values.
    pub fn has_missing_values(&self) -> bool {
        self.missing_value_counts.values().any(|count| *count > 0)
    }

    /// Columns with at least one missing value.
    pub fn columns_with_missing_values(&self) -> Vec<&str> {
        self.missing_value_counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(column, _)| column.as_str())
            .collect()
    }
}
