//! HTTP client for the attrition backend.
//!
//! One client implements all three service ports. The backend keeps the
//! uploaded dataset in its own session, so `explore` and `score` take no
//! arguments.
//!
//! # Configuration
//!
//! ```ignore
//! let client = AttritionApiClient::new(
//!     AttritionApiConfig::new("http://localhost:8000").with_timeout(Duration::from_secs(60)),
//! )?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::workflow::DatasetFormat;
use crate::ports::{
    ExplorationReport, ExplorationService, IngestionReport, IngestionService, ScoringReport,
    ScoringService, ServiceError, UploadFile,
};

use super::wire::{error_detail, ExploreResponse, PredictResponse, UploadResponse};

/// Configuration for the attrition backend client.
#[derive(Debug, Clone)]
pub struct AttritionApiConfig {
    /// Base URL without trailing slash (default: http://localhost:8000).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for AttritionApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

impl AttritionApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// reqwest-based implementation of the service ports.
#[derive(Debug, Clone)]
pub struct AttritionApiClient {
    config: AttritionApiConfig,
    client: Client,
}

impl AttritionApiClient {
    pub fn new(config: AttritionApiConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn transport_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            ServiceError::Network(format!("Connection failed: {}", e))
        } else {
            ServiceError::Network(e.to_string())
        }
    }

    /// Turns a non-success status into `Rejected` with the upstream detail.
    async fn check_status(&self, response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body);
        let detail = if detail.is_empty() {
            status.to_string()
        } else {
            detail
        };
        Err(ServiceError::rejected(status.as_u16(), detail))
    }

    async fn parse<T: DeserializeOwned>(&self, response: Response) -> Result<T, ServiceError> {
        let response = self.check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Parse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl IngestionService for AttritionApiClient {
    async fn ingest(
        &self,
        file: &UploadFile,
        format: DatasetFormat,
    ) -> Result<IngestionReport, ServiceError> {
        let file_name = format.normalize_file_name(&file.name);
        debug!(%file_name, %format, "POST /upload");
        let part = Part::bytes(file.contents.clone())
            .file_name(file_name)
            .mime_str(format.mime_type())
            .map_err(|e| ServiceError::Parse(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body: UploadResponse = self.parse(response).await?;
        Ok(body.into())
    }
}

#[async_trait]
impl ExplorationService for AttritionApiClient {
    async fn explore(&self) -> Result<ExplorationReport, ServiceError> {
        debug!("GET /explore");
        let response = self
            .client
            .get(self.url("/explore"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body: ExploreResponse = self.parse(response).await?;
        Ok(body.into())
    }
}

#[async_trait]
impl ScoringService for AttritionApiClient {
    async fn score(&self) -> Result<ScoringReport, ServiceError> {
        debug!("POST /predict");
        let response = self
            .client
            .post(self.url("/predict"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let body: PredictResponse = self.parse(response).await?;
        ScoringReport::try_from(body)
    }
}
