//! HTTP routes for the workflow API.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{
    get_detail, get_exploration, get_risk_table, get_snapshot, health, move_forward, open_detail,
    reset, retreat, run_exploration, run_prediction, select_record, upload_dataset,
    WorkflowAppState,
};

/// Creates the workflow router with all routes.
pub fn workflow_routes(state: WorkflowAppState, upload_limit_bytes: usize) -> Router {
    Router::new()
        // GET /api/workflow
        .route("/api/workflow", get(get_snapshot))
        // POST /api/workflow/upload?file_name=...
        .route(
            "/api/workflow/upload",
            post(upload_dataset).layer(DefaultBodyLimit::max(upload_limit_bytes)),
        )
        // POST /api/workflow/explore
        .route("/api/workflow/explore", post(run_exploration))
        // GET /api/workflow/exploration
        .route("/api/workflow/exploration", get(get_exploration))
        // POST /api/workflow/predict
        .route("/api/workflow/predict", post(run_prediction))
        // GET /api/workflow/risk-table
        .route("/api/workflow/risk-table", get(get_risk_table))
        // PUT /api/workflow/selection
        .route("/api/workflow/selection", put(select_record))
        // POST|GET /api/workflow/detail
        .route("/api/workflow/detail", post(open_detail).get(get_detail))
        // POST /api/workflow/forward
        .route("/api/workflow/forward", post(move_forward))
        // POST /api/workflow/retreat
        .route("/api/workflow/retreat", post(retreat))
        // POST /api/workflow/reset
        .route("/api/workflow/reset", post(reset))
        // GET /health
        .route("/health", get(health))
        .with_state(state)
}
