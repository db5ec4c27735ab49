//! Scripted mock of the attrition services.
//!
//! Implements all three service ports so tests and local runs work without
//! the Python backend.
//!
//! # Features
//!
//! - Queued responses per port, consumed in order
//! - A built-in sample dataset when a queue is empty
//! - Simulated latency for concurrency tests
//! - Call counting for verification
//!
//! # Example
//!
//! ```ignore
//! let mock = MockAttritionServices::new()
//!     .with_scoring_error(ServiceError::rejected(500, "Model not loaded"))
//!     .with_delay(Duration::from_millis(50));
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::sleep;

use crate::domain::foundation::EmployeeId;
use crate::domain::risk::{DriverAttributes, EmployeeRecord, RiskSummary};
use crate::domain::workflow::{DatasetFormat, NumericSummary, PreviewRow};
use crate::ports::{
    ExplorationReport, ExplorationService, IngestionReport, IngestionService, RawCategorical,
    RawSeries, ScoringReport, ScoringService, ServiceError, UploadFile,
};

/// Number of calls made to each port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub ingest: usize,
    pub explore: usize,
    pub score: usize,
}

#[derive(Debug, Default)]
struct Script {
    ingest: VecDeque<Result<IngestionReport, ServiceError>>,
    explore: VecDeque<Result<ExplorationReport, ServiceError>>,
    score: VecDeque<Result<ScoringReport, ServiceError>>,
    calls: CallCounts,
    uploaded: Vec<String>,
}

/// Mock ingestion, exploration and scoring service.
///
/// Clones share the same script and counters.
#[derive(Debug, Clone, Default)]
pub struct MockAttritionServices {
    script: Arc<Mutex<Script>>,
    delay: Duration,
}

impl MockAttritionServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ingestion(self, report: IngestionReport) -> Self {
        self.script().ingest.push_back(Ok(report));
        self
    }

    pub fn with_ingestion_error(self, error: ServiceError) -> Self {
        self.script().ingest.push_back(Err(error));
        self
    }

    pub fn with_exploration(self, report: ExplorationReport) -> Self {
        self.script().explore.push_back(Ok(report));
        self
    }

    pub fn with_exploration_error(self, error: ServiceError) -> Self {
        self.script().explore.push_back(Err(error));
        self
    }

    pub fn with_scoring(self, report: ScoringReport) -> Self {
        self.script().score.push_back(Ok(report));
        self
    }

    pub fn with_scoring_error(self, error: ServiceError) -> Self {
        self.script().score.push_back(Err(error));
        self
    }

    /// Sets the simulated latency of every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> CallCounts {
        self.script().calls
    }

    /// Names of the files passed to `ingest`, in call order.
    pub fn uploaded_files(&self) -> Vec<String> {
        self.script().uploaded.clone()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl IngestionService for MockAttritionServices {
    async fn ingest(
        &self,
        file: &UploadFile,
        _format: DatasetFormat,
    ) -> Result<IngestionReport, ServiceError> {
        let next = {
            let mut script = self.script();
            script.calls.ingest += 1;
            script.uploaded.push(file.name.clone());
            script.ingest.pop_front()
        };
        self.pause().await;
        next.unwrap_or_else(|| Ok(sample_ingestion()))
    }
}

#[async_trait]
impl ExplorationService for MockAttritionServices {
    async fn explore(&self) -> Result<ExplorationReport, ServiceError> {
        let next = {
            let mut script = self.script();
            script.calls.explore += 1;
            script.explore.pop_front()
        };
        self.pause().await;
        next.unwrap_or_else(|| Ok(sample_exploration()))
    }
}

#[async_trait]
impl ScoringService for MockAttritionServices {
    async fn score(&self) -> Result<ScoringReport, ServiceError> {
        let next = {
            let mut script = self.script();
            script.calls.score += 1;
            script.score.pop_front()
        };
        self.pause().await;
        next.unwrap_or_else(|| Ok(sample_scoring()))
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Sample dataset
// ─────────────────────────────────────────────────────────────────────────

const SAMPLE: [(&str, &str, &str, u32, f64, f64); 6] = [
    ("1001", "Sales", "Sales Executive", 29, 2800.0, 82.0),
    ("1002", "Research & Development", "Research Scientist", 41, 6100.0, 12.5),
    ("1003", "Research & Development", "Laboratory Technician", 33, 3400.0, 45.0),
    ("1004", "Human Resources", "Human Resources", 26, 2500.0, 64.0),
    ("1005", "Sales", "Sales Representative", 38, 4200.0, 30.0),
    ("1006", "Research & Development", "Manager", 52, 15000.0, 5.0),
];

fn column_names() -> Vec<String> {
    [
        "EmployeeNumber",
        "Age",
        "Department",
        "JobRole",
        "MonthlyIncome",
        "OverTime",
        "YearsAtCompany",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

/// Ingestion report for the six-employee sample.
pub fn sample_ingestion() -> IngestionReport {
    let preview_rows = SAMPLE
        .iter()
        .take(5)
        .filter_map(|(id, dept, role, age, income, _)| {
            json!({
                "EmployeeNumber": id,
                "Age": age,
                "Department": dept,
                "JobRole": role,
                "MonthlyIncome": income,
            })
            .as_object()
            .cloned()
        })
        .collect::<Vec<PreviewRow>>();

    IngestionReport {
        row_count: SAMPLE.len(),
        columns: column_names(),
        preview_rows,
        missing_value_counts: column_names().into_iter().map(|c| (c, 0)).collect(),
    }
}

/// Exploration report for the six-employee sample.
pub fn sample_exploration() -> ExplorationReport {
    let series = |labels: &[&str], values: &[u64]| RawSeries {
        labels: labels.iter().map(|l| l.to_string()).collect(),
        values: values.to_vec(),
    };
    let department = series(&["Research & Development", "Sales", "Human Resources"], &[3, 2, 1]);

    ExplorationReport {
        total_rows: SAMPLE.len() as u64,
        total_columns: column_names().len() as u64,
        missing_values: column_names().into_iter().map(|c| (c, 0)).collect(),
        charts: BTreeMap::from([
            (
                "age_distribution".to_string(),
                series(&["18-25", "25-35", "35-45", "45-55", "55-65"], &[0, 3, 2, 1, 0]),
            ),
            ("department".to_string(), department.clone()),
            (
                "monthly_income".to_string(),
                series(&["$2,500 - $2,950", "$2,950 - $3,800", "$3,800 - $15,000"], &[2, 2, 2]),
            ),
        ]),
        numerical: BTreeMap::from([(
            "Age".to_string(),
            NumericSummary {
                mean: 36.5,
                std: 9.44,
                min: 26.0,
                max: 52.0,
                median: 35.5,
            },
        )]),
        categorical: BTreeMap::from([(
            "Department".to_string(),
            RawCategorical {
                unique: 3,
                series: department,
            },
        )]),
    }
}

/// Scoring report for the six-employee sample, two records per bucket.
pub fn sample_scoring() -> ScoringReport {
    let records: Vec<EmployeeRecord> = SAMPLE
        .iter()
        .filter_map(|(id, dept, role, age, income, p)| {
            let id = EmployeeId::new(*id).ok()?;
            Some(
                EmployeeRecord::new(id, *dept, *role, *p)
                    .with_age(*age)
                    .with_monthly_income(*income)
                    .with_years_at_company(age.saturating_sub(24) / 2)
                    .with_drivers(DriverAttributes {
                        overtime: Some(*p >= 60.0),
                        ..DriverAttributes::default()
                    }),
            )
        })
        .collect();
    let summary = RiskSummary::from_records(&records);

    ScoringReport {
        records,
        summary: Some(summary),
    }
}
