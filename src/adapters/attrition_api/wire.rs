//! JSON bodies exchanged with the attrition backend.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::foundation::EmployeeId;
use crate::domain::risk::{DriverAttributes, EmployeeRecord, RiskSummary};
use crate::domain::workflow::{NumericSummary, PreviewRow};
use crate::ports::{
    ExplorationReport, IngestionReport, RawCategorical, RawSeries, ScoringReport, ServiceError,
};

/// `POST /upload` response.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub rows: usize,
    pub columns: Vec<String>,
    #[serde(default)]
    pub preview: Vec<PreviewRow>,
    #[serde(default)]
    pub missing_values: BTreeMap<String, u64>,
}

impl From<UploadResponse> for IngestionReport {
    fn from(body: UploadResponse) -> Self {
        IngestionReport {
            row_count: body.rows,
            columns: body.columns,
            preview_rows: body.preview,
            missing_value_counts: body.missing_values,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl From<Series> for RawSeries {
    fn from(series: Series) -> Self {
        RawSeries {
            labels: series.labels,
            values: series.values,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExploreSummary {
    pub total_rows: u64,
    pub total_cols: u64,
    #[serde(default)]
    pub missing_values: BTreeMap<String, u64>,
}

#[derive(Debug, Deserialize)]
pub struct Categorical {
    pub unique: u64,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub counts: Vec<u64>,
}

/// `GET /explore` response.
#[derive(Debug, Deserialize)]
pub struct ExploreResponse {
    pub summary: ExploreSummary,
    #[serde(default)]
    pub charts: BTreeMap<String, Series>,
    #[serde(default)]
    pub numerical: BTreeMap<String, NumericSummary>,
    #[serde(default)]
    pub categorical: BTreeMap<String, Categorical>,
}

impl From<ExploreResponse> for ExplorationReport {
    fn from(body: ExploreResponse) -> Self {
        ExplorationReport {
            total_rows: body.summary.total_rows,
            total_columns: body.summary.total_cols,
            missing_values: body.summary.missing_values,
            charts: body
                .charts
                .into_iter()
                .map(|(name, series)| (name, series.into()))
                .collect(),
            numerical: body.numerical,
            categorical: body
                .categorical
                .into_iter()
                .map(|(name, c)| {
                    let series = RawSeries {
                        labels: c.labels,
                        values: c.counts,
                    };
                    (
                        name,
                        RawCategorical {
                            unique: c.unique,
                            series,
                        },
                    )
                })
                .collect(),
        }
    }
}

/// One scored employee as sent by the backend.
#[derive(Debug, Deserialize)]
pub struct Prediction {
    pub employee_id: String,
    #[serde(default = "unknown")]
    pub department: String,
    #[serde(default = "unknown")]
    pub job_role: String,
    /// "Yes" or "No".
    #[serde(default)]
    pub attrition_prediction: Option<String>,
    pub attrition_probability: f64,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub years_at_company: Option<u32>,
    #[serde(default)]
    pub years_in_current_role: Option<u32>,
    #[serde(default)]
    pub years_since_last_promotion: Option<u32>,
    #[serde(default)]
    pub distance_from_home: Option<u32>,
    #[serde(default)]
    pub training_times_last_year: Option<u32>,
    /// "Yes" or "No".
    #[serde(default)]
    pub over_time: Option<String>,
    #[serde(default)]
    pub num_companies_worked: Option<u32>,
    #[serde(default)]
    pub percent_salary_hike: Option<f64>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn yes(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("yes")
}

impl TryFrom<Prediction> for EmployeeRecord {
    type Error = ServiceError;

    fn try_from(p: Prediction) -> Result<Self, Self::Error> {
        let id = EmployeeId::new(p.employee_id)
            .map_err(|err| ServiceError::Parse(format!("Invalid prediction: {}", err)))?;

        let mut record = EmployeeRecord::new(id, p.department, p.job_role, p.attrition_probability)
            .with_drivers(DriverAttributes {
                years_in_current_role: p.years_in_current_role,
                years_since_last_promotion: p.years_since_last_promotion,
                distance_from_home: p.distance_from_home,
                training_times_last_year: p.training_times_last_year,
                overtime: p.over_time.as_deref().map(yes),
                num_companies_worked: p.num_companies_worked,
                percent_salary_hike: p.percent_salary_hike,
            })
            .with_risk_factors(p.risk_factors);
        if let Some(decision) = p.attrition_prediction.as_deref() {
            record.predicted_attrition = yes(decision);
        }
        record.age = p.age;
        record.monthly_income = p.monthly_income;
        record.years_at_company = p.years_at_company;
        Ok(record)
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictSummary {
    pub total_employees: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
    #[serde(default)]
    pub average_attrition_probability: Option<f64>,
}

impl From<PredictSummary> for RiskSummary {
    fn from(s: PredictSummary) -> Self {
        RiskSummary {
            total_employees: s.total_employees,
            low_risk: s.low_risk,
            medium_risk: s.medium_risk,
            high_risk: s.high_risk,
            average_probability: s.average_attrition_probability,
        }
    }
}

/// `POST /predict` response.
#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<Prediction>,
    #[serde(default)]
    pub summary: Option<PredictSummary>,
}

impl TryFrom<PredictResponse> for ScoringReport {
    type Error = ServiceError;

    fn try_from(body: PredictResponse) -> Result<Self, Self::Error> {
        let records = body
            .predictions
            .into_iter()
            .map(EmployeeRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ScoringReport {
            records,
            summary: body.summary.map(RiskSummary::from),
        })
    }
}

/// Extracts the message from an error body.
///
/// `{"detail": "..."}` yields the string; any other `detail` value is
/// rendered as JSON; a body without `detail` is returned as is.
pub fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}
