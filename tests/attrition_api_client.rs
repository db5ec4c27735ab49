//! Integration tests for the attrition backend client.
//!
//! A fake backend is served on a loopback port and the client is exercised
//! against it:
//! 1. Multipart upload carries the file name (lower-case extension) and contents
//! 2. Success bodies are translated into port reports
//! 3. Error bodies surface the backend's `detail` verbatim
//! 4. Transport failures map to Network and Timeout errors

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use attrition_sherpa::adapters::attrition_api::{AttritionApiClient, AttritionApiConfig};
use attrition_sherpa::domain::workflow::DatasetFormat;
use attrition_sherpa::ports::{
    ExplorationService, IngestionService, ScoringService, ServiceError, UploadFile,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str) -> AttritionApiClient {
    AttritionApiClient::new(AttritionApiConfig::new(base_url)).unwrap()
}

fn upload_body() -> serde_json::Value {
    json!({
        "status": "success",
        "message": "File uploaded: staff.csv",
        "rows": 2,
        "columns": ["EmployeeNumber", "Department"],
        "preview": [
            {"EmployeeNumber": 1, "Department": "Sales"},
            {"EmployeeNumber": 2, "Department": "Research & Development"}
        ],
        "missing_values": {"EmployeeNumber": 0, "Department": 1}
    })
}

// =============================================================================
// Success paths
// =============================================================================

#[tokio::test]
async fn upload_sends_multipart_file() {
    let received: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let app = Router::new().route(
        "/upload",
        post(move |body: Bytes| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().extend_from_slice(&body);
                Json(upload_body())
            }
        }),
    );
    let base = serve(app).await;

    let file = UploadFile::new("staff.csv", b"EmployeeNumber,Department\n1,Sales\n".to_vec());
    let report = client(&base).ingest(&file, DatasetFormat::Csv).await.unwrap();

    assert_eq!(report.row_count, 2);
    assert_eq!(report.columns, vec!["EmployeeNumber", "Department"]);
    assert_eq!(report.preview_rows.len(), 2);
    assert_eq!(report.missing_value_counts.get("Department"), Some(&1));

    let body = String::from_utf8_lossy(&received.lock().unwrap()).to_string();
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"staff.csv\""));
    assert!(body.contains("1,Sales"));
}

#[tokio::test]
async fn upload_sends_lower_case_extension() {
    let received: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let app = Router::new().route(
        "/upload",
        post(move |body: Bytes| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().extend_from_slice(&body);
                Json(upload_body())
            }
        }),
    );
    let base = serve(app).await;

    let file = UploadFile::new("STAFF.XLSX", b"PK\x03\x04".to_vec());
    client(&base).ingest(&file, DatasetFormat::Xlsx).await.unwrap();

    let body = String::from_utf8_lossy(&received.lock().unwrap()).to_string();
    assert!(body.contains("filename=\"STAFF.xlsx\""));
    assert!(!body.contains("STAFF.XLSX"));
}

#[tokio::test]
async fn explore_translates_charts_and_categoricals() {
    let app = Router::new().route(
        "/explore",
        get(|| async {
            Json(json!({
                "summary": {"total_rows": 3, "total_cols": 4, "missing_values": {}},
                "charts": {
                    "department": {"labels": ["Sales", "HR"], "values": [2, 1]}
                },
                "numerical": {
                    "Age": {"mean": 30.0, "std": 2.0, "min": 28.0, "max": 32.0, "median": 30.0}
                },
                "categorical": {
                    "Department": {"unique": 2, "labels": ["Sales", "HR"], "counts": [2, 1]}
                }
            }))
        }),
    );
    let base = serve(app).await;

    let report = client(&base).explore().await.unwrap();

    assert_eq!(report.total_rows, 3);
    assert_eq!(report.total_columns, 4);
    assert_eq!(report.charts["department"].values, vec![2, 1]);
    assert_eq!(report.numerical["Age"].median, 30.0);
    assert_eq!(report.categorical["Department"].unique, 2);
}

#[tokio::test]
async fn predict_translates_records_and_drivers() {
    let app = Router::new().route(
        "/predict",
        post(|| async {
            Json(json!({
                "status": "success",
                "predictions": [
                    {
                        "employee_id": "1001",
                        "department": "Sales",
                        "job_role": "Sales Executive",
                        "attrition_prediction": "Yes",
                        "attrition_probability": 81.5,
                        "age": 29,
                        "monthly_income": 2800.0,
                        "years_at_company": 2,
                        "over_time": "Yes",
                        "risk_factors": [
                            "Overtime: Frequently working overtime - High workload stress",
                            "Low job satisfaction (1/4)"
                        ]
                    },
                    {
                        "employee_id": "1002",
                        "attrition_probability": 12.0
                    }
                ],
                "summary": {
                    "total_employees": 2,
                    "high_risk": 1,
                    "medium_risk": 0,
                    "low_risk": 1,
                    "average_attrition_probability": 46.75
                }
            }))
        }),
    );
    let base = serve(app).await;

    let report = client(&base).score().await.unwrap();

    assert_eq!(report.records.len(), 2);
    let first = &report.records[0];
    assert_eq!(first.employee_id.as_str(), "1001");
    assert!(first.predicted_attrition);
    assert_eq!(first.drivers.overtime, Some(true));
    assert_eq!(first.age, Some(29));
    assert_eq!(
        first.risk_factors,
        vec![
            "Overtime: Frequently working overtime - High workload stress".to_string(),
            "Low job satisfaction (1/4)".to_string(),
        ]
    );

    let second = &report.records[1];
    assert_eq!(second.department, "Unknown");
    assert_eq!(second.drivers.overtime, None);
    assert!(second.risk_factors.is_empty());

    let summary = report.summary.unwrap();
    assert_eq!(summary.high_risk, 1);
    assert_eq!(summary.average_probability, Some(46.75));
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn error_detail_is_passed_through() {
    let app = Router::new().route(
        "/explore",
        get(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"detail": "No file uploaded yet"})),
            )
        }),
    );
    let base = serve(app).await;

    let err = client(&base).explore().await.unwrap_err();

    assert_eq!(err, ServiceError::rejected(400, "No file uploaded yet"));
    assert_eq!(err.to_string(), "No file uploaded yet");
}

#[tokio::test]
async fn plain_text_error_body_is_kept() {
    let app = Router::new().route(
        "/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model exploded") }),
    );
    let base = serve(app).await;

    let err = client(&base).score().await.unwrap_err();

    assert_eq!(err, ServiceError::rejected(500, "model exploded"));
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_error() {
    let app = Router::new().route("/predict", post(|| async { Json(json!({"status": "ok"})) }));
    let base = serve(app).await;

    let err = client(&base).score().await.unwrap_err();

    assert!(matches!(err, ServiceError::Parse(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let app = Router::new().route(
        "/explore",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({}))
        }),
    );
    let base = serve(app).await;
    let client = AttritionApiClient::new(
        AttritionApiConfig::new(base).with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let err = client.explore().await.unwrap_err();

    assert!(matches!(err, ServiceError::Timeout { .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr)).score().await.unwrap_err();

    assert!(matches!(err, ServiceError::Network(_)));
}
