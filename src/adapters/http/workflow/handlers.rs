//! HTTP handlers for the workflow API.
//!
//! Thin wrappers over `WorkflowSession`; all rules live in the engine.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{GatewayError, RiskTableReport, WorkflowSession, WorkflowSnapshot};
use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::risk::RecordDetail;
use crate::domain::workflow::{DatasetHandle, ExplorationSummary, WorkflowError};
use crate::ports::UploadFile;

use super::dto::{
    ErrorResponse, HealthResponse, PredictionView, RetreatRequest, RiskTableParams,
    SelectionRequest, UploadParams,
};

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Workflow API error that implements IntoResponse.
#[derive(Debug)]
pub enum WorkflowApiError {
    Gateway(GatewayError),
    Workflow(WorkflowError),
    Validation(ValidationError),
}

impl WorkflowApiError {
    fn status(&self) -> StatusCode {
        match self {
            WorkflowApiError::Gateway(GatewayError::UnsupportedFormat { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            WorkflowApiError::Gateway(GatewayError::Workflow(err)) | WorkflowApiError::Workflow(err) => {
                workflow_status(err)
            }
            WorkflowApiError::Gateway(err) if err.is_upstream() => StatusCode::BAD_GATEWAY,
            WorkflowApiError::Gateway(GatewayError::Aborted { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WorkflowApiError::Gateway(_) => StatusCode::CONFLICT,
            WorkflowApiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            WorkflowApiError::Gateway(err) => ErrorResponse::new(err.code(), err.to_string()),
            WorkflowApiError::Workflow(err) => ErrorResponse::new(err.code(), err.to_string()),
            WorkflowApiError::Validation(err) => ErrorResponse::new(ErrorCode::ValidationFailed, err.to_string())
                .with_details(serde_json::json!({ "kind": err.code().as_str() })),
        }
    }
}

fn workflow_status(err: &WorkflowError) -> StatusCode {
    match err {
        WorkflowError::UnknownRecord(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::CONFLICT,
    }
}

impl IntoResponse for WorkflowApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = %status, error = ?self, "Workflow request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<GatewayError> for WorkflowApiError {
    fn from(err: GatewayError) -> Self {
        WorkflowApiError::Gateway(err)
    }
}

impl From<WorkflowError> for WorkflowApiError {
    fn from(err: WorkflowError) -> Self {
        WorkflowApiError::Workflow(err)
    }
}

impl From<ValidationError> for WorkflowApiError {
    fn from(err: ValidationError) -> Self {
        WorkflowApiError::Validation(err)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state.
#[derive(Clone)]
pub struct WorkflowAppState {
    pub session: Arc<WorkflowSession>,
}

impl WorkflowAppState {
    pub fn new(session: Arc<WorkflowSession>) -> Self {
        Self { session }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/workflow
pub async fn get_snapshot(State(state): State<WorkflowAppState>) -> Json<WorkflowSnapshot> {
    Json(state.session.snapshot())
}

/// POST /api/workflow/upload?file_name=staff.csv
///
/// The request body is the raw file.
pub async fn upload_dataset(
    State(state): State<WorkflowAppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<DatasetHandle>, WorkflowApiError> {
    let file = UploadFile::new(params.file_name, body.to_vec());
    let dataset = state.session.upload(file).await?;
    Ok(Json(dataset))
}

/// POST /api/workflow/explore
pub async fn run_exploration(
    State(state): State<WorkflowAppState>,
) -> Result<Json<ExplorationSummary>, WorkflowApiError> {
    Ok(Json(state.session.explore().await?))
}

/// GET /api/workflow/exploration
pub async fn get_exploration(
    State(state): State<WorkflowAppState>,
) -> Result<Json<ExplorationSummary>, WorkflowApiError> {
    Ok(Json(state.session.exploration()?))
}

/// POST /api/workflow/predict
pub async fn run_prediction(
    State(state): State<WorkflowAppState>,
) -> Result<Json<PredictionView>, WorkflowApiError> {
    let scored = state.session.predict().await?;
    Ok(Json(PredictionView::from(&scored)))
}

/// GET /api/workflow/risk-table?department=&risk=&search=
pub async fn get_risk_table(
    State(state): State<WorkflowAppState>,
    Query(params): Query<RiskTableParams>,
) -> Result<Json<RiskTableReport>, WorkflowApiError> {
    let filter = params.into_filter()?;
    Ok(Json(state.session.risk_table(&filter)?))
}

/// PUT /api/workflow/selection
pub async fn select_record(
    State(state): State<WorkflowAppState>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<RecordDetail>, WorkflowApiError> {
    let id = request.employee_id()?;
    Ok(Json(state.session.select(id)?))
}

/// POST /api/workflow/detail
pub async fn open_detail(
    State(state): State<WorkflowAppState>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<RecordDetail>, WorkflowApiError> {
    let id = request.employee_id()?;
    Ok(Json(state.session.show_detail(id)?))
}

/// GET /api/workflow/detail
pub async fn get_detail(
    State(state): State<WorkflowAppState>,
) -> Result<Json<RecordDetail>, WorkflowApiError> {
    Ok(Json(state.session.detail()?))
}

/// POST /api/workflow/forward
pub async fn move_forward(
    State(state): State<WorkflowAppState>,
) -> Result<Json<WorkflowSnapshot>, WorkflowApiError> {
    Ok(Json(state.session.forward()?))
}

/// POST /api/workflow/retreat
pub async fn retreat(
    State(state): State<WorkflowAppState>,
    Json(request): Json<RetreatRequest>,
) -> Result<Json<WorkflowSnapshot>, WorkflowApiError> {
    let stage = request.stage()?;
    Ok(Json(state.session.retreat(stage)?))
}

/// POST /api/workflow/reset
pub async fn reset(State(state): State<WorkflowAppState>) -> Json<WorkflowSnapshot> {
    Json(state.session.reset())
}

/// GET /health
pub async fn health(State(state): State<WorkflowAppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stage: state.session.snapshot().stage,
    })
}
