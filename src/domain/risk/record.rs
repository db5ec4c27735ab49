//! Scored employee record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::EmployeeId;

use super::RiskBucket;

/// One employee row after the scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub employee_id: EmployeeId,
    pub department: String,
    pub job_role: String,
    pub age: Option<u32>,
    pub monthly_income: Option<f64>,
    pub years_at_company: Option<u32>,
    /// Binary model decision, independent of the probability bucket.
    pub predicted_attrition: bool,
    /// Probability of leaving, on a 0-100 scale.
    pub attrition_probability: f64,
    #[serde(default)]
    pub drivers: DriverAttributes,
    /// Risk factors stated by the scoring service, in its order.
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

impl EmployeeRecord {
    /// Creates a record with the identifying attributes and a probability.
    pub fn new(
        employee_id: EmployeeId,
        department: impl Into<String>,
        job_role: impl Into<String>,
        attrition_probability: f64,
    ) -> Self {
        Self {
            employee_id,
            department: department.into(),
            job_role: job_role.into(),
            age: None,
            monthly_income: None,
            years_at_company: None,
            predicted_attrition: attrition_probability >= 50.0,
            attrition_probability,
            drivers: DriverAttributes::default(),
            risk_factors: Vec::new(),
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_monthly_income(mut self, income: f64) -> Self {
        self.monthly_income = Some(income);
        self
    }

    pub fn with_years_at_company(mut self, years: u32) -> Self {
        self.years_at_company = Some(years);
        self
    }

    pub fn with_drivers(mut self, drivers: DriverAttributes) -> Self {
        self.drivers = drivers;
        self
    }

    pub fn with_risk_factors(mut self, factors: Vec<String>) -> Self {
        self.risk_factors = factors;
        self
    }

    /// Risk bucket of this record, recomputed from the probability.
    pub fn bucket(&self) -> RiskBucket {
        RiskBucket::from_probability(self.attrition_probability)
    }
}

/// Optional attributes that explain a record's risk.
///
/// Any of them may be absent when the uploaded dataset lacks the column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverAttributes {
    pub years_in_current_role: Option<u32>,
    pub years_since_last_promotion: Option<u32>,
    pub distance_from_home: Option<u32>,
    pub training_times_last_year: Option<u32>,
    pub overtime: Option<bool>,
    pub num_companies_worked: Option<u32>,
    pub percent_salary_hike: Option<f64>,
}
