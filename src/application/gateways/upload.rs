//! UploadGateway - hands the selected file to the ingestion service.

use std::sync::Arc;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::domain::workflow::{DatasetFormat, DatasetHandle, StagePayload, PREVIEW_ROWS};
use crate::ports::{IngestionReport, IngestionService, UploadFile};

use super::GatewayError;

/// Gateway for the Upload stage.
#[derive(Clone)]
pub struct UploadGateway {
    service: Arc<dyn IngestionService>,
}

impl UploadGateway {
    pub fn new(service: Arc<dyn IngestionService>) -> Self {
        Self { service }
    }

    /// Pre-flight extension check, done before any service call.
    pub fn check_format(file: &UploadFile) -> Result<DatasetFormat, GatewayError> {
        DatasetFormat::from_file_name(&file.name).ok_or_else(|| GatewayError::UnsupportedFormat {
            file_name: file.name.clone(),
        })
    }

    /// Ingests `file` and builds the Upload payload.
    pub fn invoke(&self, file: UploadFile) -> BoxFuture<'static, Result<StagePayload, GatewayError>> {
        let service = Arc::clone(&self.service);
        async move {
            let format = Self::check_format(&file)?;
            debug!(file_name = %file.name, %format, bytes = file.size(), "Ingesting dataset");

            let report = service.ingest(&file, format).await.map_err(|err| {
                warn!(file_name = %file.name, error = %err, "Ingestion failed");
                GatewayError::Ingestion(err.to_string())
            })?;

            let dataset = Self::to_handle(file.name, format, report)?;
            info!(
                file_name = %dataset.file_name,
                rows = dataset.row_count,
                columns = dataset.columns.len(),
                "Dataset ingested"
            );
            Ok(StagePayload::Dataset(dataset))
        }
        .boxed()
    }

    fn to_handle(
        file_name: String,
        format: DatasetFormat,
        report: IngestionReport,
    ) -> Result<DatasetHandle, GatewayError> {
        if report.columns.is_empty() {
            return Err(GatewayError::Ingestion(format!(
                "Ingestion of '{}' reported no columns",
                file_name
            )));
        }

        let mut preview_rows = report.preview_rows;
        preview_rows.truncate(PREVIEW_ROWS);

        Ok(DatasetHandle {
            file_name,
            format,
            row_count: report.row_count,
            columns: report.columns,
            preview_rows,
            missing_value_counts: report.missing_value_counts,
            uploaded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{sample_ingestion, MockAttritionServices};
    use crate::ports::ServiceError;
    use serde_json::json;

    fn gateway(mock: &MockAttritionServices) -> UploadGateway {
        UploadGateway::new(Arc::new(mock.clone()))
    }

    fn csv(name: &str) -> UploadFile {
        UploadFile::new(name, b"EmployeeNumber,Department\n1,Sales\n".to_vec())
    }

    #[tokio::test]
    async fn rejects_unsupported_extension_without_calling_service() {
        let mock = MockAttritionServices::new();
        let result = gateway(&mock).invoke(csv("staff.json")).await;

        assert_eq!(
            result,
            Err(GatewayError::UnsupportedFormat {
                file_name: "staff.json".to_string()
            })
        );
        assert_eq!(mock.calls().ingest, 0);
    }

    #[tokio::test]
    async fn accepts_uppercase_extension() {
        let mock = MockAttritionServices::new();
        let payload = gateway(&mock).invoke(csv("STAFF.XLSX")).await.unwrap();

        match payload {
            StagePayload::Dataset(dataset) => assert_eq!(dataset.format, DatasetFormat::Xlsx),
            other => panic!("Expected dataset payload, got {:?}", other),
        }
        assert_eq!(mock.uploaded_files(), vec!["STAFF.XLSX".to_string()]);
    }

    #[tokio::test]
    async fn surfaces_upstream_detail_verbatim() {
        let mock = MockAttritionServices::new()
            .with_ingestion_error(ServiceError::rejected(400, "Missing columns: OverTime"));
        let result = gateway(&mock).invoke(csv("staff.csv")).await;

        assert_eq!(
            result,
            Err(GatewayError::Ingestion("Missing columns: OverTime".to_string()))
        );
    }

    #[tokio::test]
    async fn truncates_preview_to_five_rows() {
        let mut report = sample_ingestion();
        report.preview_rows = (0..8)
            .map(|i| json!({ "EmployeeNumber": i }).as_object().cloned().unwrap())
            .collect();
        let mock = MockAttritionServices::new().with_ingestion(report);

        match gateway(&mock).invoke(csv("staff.csv")).await.unwrap() {
            StagePayload::Dataset(dataset) => assert_eq!(dataset.preview_rows.len(), PREVIEW_ROWS),
            other => panic!("Expected dataset payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn report_without_columns_is_an_ingestion_error() {
        let mut report = sample_ingestion();
        report.columns.clear();
        let mock = MockAttritionServices::new().with_ingestion(report);

        let result = gateway(&mock).invoke(csv("staff.csv")).await;
        assert!(matches!(result, Err(GatewayError::Ingestion(_))));
    }
}
