//! Record classifier - the single source of risk buckets and risk factors.
//!
//! Every place that needs a bucket (table rows, detail view, summary counts)
//! goes through this module so the three can never disagree.

use serde::Serialize;

use super::{EmployeeRecord, RiskBucket};

/// Probability above which a record counts as critical in view statistics.
pub const CRITICAL_THRESHOLD: f64 = 75.0;

/// Maximum number of attribute drivers reported for a Medium record.
const MEDIUM_FACTOR_LIMIT: usize = 3;

const HIGH_FALLBACK: &str =
    "Overall profile indicates higher attrition risk based on combination of factors";
const MEDIUM_FALLBACK: &str =
    "Some indicators suggest moderate attrition concern - recommend engagement check";

/// Result of classifying a probability or a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub bucket: RiskBucket,
    pub factors: Vec<String>,
}

/// Stateless classifier for attrition probabilities.
pub struct RecordClassifier;

impl RecordClassifier {
    /// Classifies a bare probability.
    ///
    /// Without record attributes the factors are generic: empty for Low, one
    /// statement for Medium and High.
    pub fn classify(probability: f64) -> Classification {
        let bucket = RiskBucket::from_probability(probability);
        let factors = match fallback_factor(bucket) {
            Some(text) => vec![text.to_string()],
            None => Vec::new(),
        };
        Classification { bucket, factors }
    }

    /// Classifies a record.
    ///
    /// Factors stated by the scoring service win; otherwise they are derived
    /// from the record's attributes. Low reports none, Medium the first
    /// three, High all of them. Medium and High fall back to a generic
    /// statement when nothing applies.
    pub fn classify_record(record: &EmployeeRecord) -> Classification {
        let bucket = record.bucket();
        let drivers = if record.risk_factors.is_empty() {
            risk_drivers(record)
        } else {
            record.risk_factors.clone()
        };

        let mut factors: Vec<String> = match bucket {
            RiskBucket::Low => Vec::new(),
            RiskBucket::Medium => drivers.into_iter().take(MEDIUM_FACTOR_LIMIT).collect(),
            RiskBucket::High => drivers,
        };

        if factors.is_empty() {
            if let Some(text) = fallback_factor(bucket) {
                factors.push(text.to_string());
            }
        }

        Classification { bucket, factors }
    }

    /// Returns true when the probability counts as critical.
    pub fn is_critical(probability: f64) -> bool {
        probability > CRITICAL_THRESHOLD
    }
}

fn fallback_factor(bucket: RiskBucket) -> Option<&'static str> {
    match bucket {
        RiskBucket::High => Some(HIGH_FALLBACK),
        RiskBucket::Medium => Some(MEDIUM_FALLBACK),
        RiskBucket::Low => None,
    }
}

/// Attribute thresholds that mark a record as at risk, in reporting order.
fn risk_drivers(record: &EmployeeRecord) -> Vec<String> {
    let d = &record.drivers;
    let mut drivers = Vec::new();

    if let Some(years) = record.years_at_company.filter(|y| *y < 5) {
        drivers.push(format!(
            "Company tenure: {} years - Recent hire with less than 5 years tenure",
            years
        ));
    }
    if let Some(income) = record.monthly_income.filter(|i| *i < 3000.0) {
        drivers.push(format!(
            "Monthly income: {} - Below average salary (< $3000/month)",
            whole_dollars(income)
        ));
    }
    if let Some(years) = d.years_in_current_role.filter(|y| *y < 2) {
        drivers.push(format!(
            "Time in role: {} years - Limited time in current role (< 2 years)",
            years
        ));
    }
    if let Some(years) = d.years_since_last_promotion.filter(|y| *y >= 3) {
        drivers.push(format!(
            "Last promotion: {} years ago - No promotion in 3+ years",
            years
        ));
    }
    if let Some(distance) = d.distance_from_home.filter(|m| *m > 10) {
        drivers.push(format!(
            "Commute distance: {} miles - Long commute (> 10 miles)",
            distance
        ));
    }
    if let Some(training) = d.training_times_last_year.filter(|t| *t < 2) {
        drivers.push(format!(
            "Training sessions: {}/year - Minimal training/development (< 2 times)",
            training
        ));
    }
    if d.overtime == Some(true) {
        drivers.push("Overtime: Frequently working overtime - High workload stress".to_string());
    }
    if let Some(companies) = d.num_companies_worked.filter(|c| *c > 5) {
        drivers.push(format!(
            "Previous employers: {} - Frequent job changes (> 5 companies)",
            companies
        ));
    }
    if let Some(hike) = d.percent_salary_hike.filter(|h| *h < 12.0) {
        drivers.push(format!(
            "Latest raise: {}% - Below average raise (< 12%)",
            hike
        ));
    }

    drivers
}

/// Formats an amount as whole dollars with thousands separators: `$2,500`.
fn whole_dollars(amount: f64) -> String {
    let digits = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount.round() < 0.0 { "-" } else { "" };
    format!("{}${}", sign, grouped)
}
