//! Ingestion Service Port - parses an uploaded dataset file.
//!
//! The service keeps the parsed rows for the later exploration and scoring
//! calls; the workflow only sees the report.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::workflow::{DatasetFormat, PreviewRow};

use super::ServiceError;

/// Port for the dataset ingestion service.
#[async_trait]
pub trait IngestionService: Send + Sync {
    /// Uploads `file` and returns what the service learned about it.
    async fn ingest(
        &self,
        file: &UploadFile,
        format: DatasetFormat,
    ) -> Result<IngestionReport, ServiceError>;
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }

    /// Fingerprint of the name and contents.
    ///
    /// Two uploads with the same fingerprint are the same request.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.name.len() as u64).to_be_bytes());
        hasher.update(self.name.as_bytes());
        hasher.update(&self.contents);
        hasher.finalize().into()
    }

    pub fn size(&self) -> usize {
        self.contents.len()
    }
}

/// Result of a successful ingestion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionReport {
    pub row_count: usize,
    pub columns: Vec<String>,
    pub preview_rows: Vec<PreviewRow>,
    pub missing_value_counts: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &[u8] = b"EmployeeNumber,Department\n1,Sales\n";

    #[test]
    fn size_counts_bytes() {
        assert_eq!(UploadFile::new("staff.csv", CSV.to_vec()).size(), 34);
    }

    #[test]
    fn digest_is_stable_for_identical_uploads() {
        let a = UploadFile::new("staff.csv", CSV.to_vec());
        let b = UploadFile::new("staff.csv", CSV.to_vec());
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn digest_changes_with_name_or_contents() {
        let base = UploadFile::new("staff.csv", CSV.to_vec());
        let renamed = UploadFile::new("other.csv", CSV.to_vec());
        let edited = UploadFile::new("staff.csv", b"EmployeeNumber\n2\n".to_vec());
        assert_ne!(base.digest(), renamed.digest());
        assert_ne!(base.digest(), edited.digest());
    }
}
