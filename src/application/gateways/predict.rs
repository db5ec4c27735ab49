//! PredictGateway - scores the dataset and validates the whole response.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::domain::risk::RiskSummary;
use crate::domain::workflow::{ScoredDataset, StagePayload};
use crate::ports::ScoringService;

use super::GatewayError;

/// Gateway for the Predict stage.
///
/// All-or-nothing: an empty result or a single unusable probability rejects
/// the response.
#[derive(Clone)]
pub struct PredictGateway {
    service: Arc<dyn ScoringService>,
}

impl PredictGateway {
    pub fn new(service: Arc<dyn ScoringService>) -> Self {
        Self { service }
    }

    pub fn invoke(&self) -> BoxFuture<'static, Result<StagePayload, GatewayError>> {
        let service = Arc::clone(&self.service);
        async move {
            debug!("Requesting attrition scores");
            let report = service.score().await.map_err(|err| {
                warn!(error = %err, "Scoring failed");
                GatewayError::Prediction(err.to_string())
            })?;

            let scored = ScoredDataset::new(report.records).map_err(|err| {
                warn!(error = %err, "Rejected scoring response");
                GatewayError::Prediction(format!("Invalid scoring response: {}", err))
            })?;

            let derived = scored.summary();
            if let Some(upstream) = report.summary {
                Self::cross_check(&upstream, &derived);
            }
            info!(
                employees = derived.total_employees,
                high = derived.high_risk,
                medium = derived.medium_risk,
                low = derived.low_risk,
                "Scores received"
            );
            Ok(StagePayload::Scored(scored))
        }
        .boxed()
    }

    /// Logs a disagreement between the service's counts and ours.
    ///
    /// Returns true when they agree. The derived summary is always used.
    fn cross_check(upstream: &RiskSummary, derived: &RiskSummary) -> bool {
        let agrees = upstream.total_employees == derived.total_employees
            && upstream.counts() == derived.counts();
        if !agrees {
            warn!(
                upstream_total = upstream.total_employees,
                upstream_high = upstream.high_risk,
                upstream_medium = upstream.medium_risk,
                upstream_low = upstream.low_risk,
                derived_total = derived.total_employees,
                derived_high = derived.high_risk,
                derived_medium = derived.medium_risk,
                derived_low = derived.low_risk,
                "Scoring service summary disagrees with classified records"
            );
        }
        agrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{sample_scoring, MockAttritionServices};
    use crate::domain::foundation::EmployeeId;
    use crate::domain::risk::EmployeeRecord;
    use crate::ports::{ScoringReport, ServiceError};

    fn gateway(mock: &MockAttritionServices) -> PredictGateway {
        PredictGateway::new(Arc::new(mock.clone()))
    }

    fn record(id: &str, p: f64) -> EmployeeRecord {
        EmployeeRecord::new(EmployeeId::new(id).unwrap(), "Sales", "Rep", p)
    }

    #[tokio::test]
    async fn valid_response_becomes_scored_payload() {
        let mock = MockAttritionServices::new();
        match gateway(&mock).invoke().await.unwrap() {
            StagePayload::Scored(scored) => assert_eq!(scored.len(), 6),
            other => panic!("Expected scored payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn one_out_of_range_probability_rejects_everything() {
        let mock = MockAttritionServices::new().with_scoring(ScoringReport {
            records: vec![record("1", 20.0), record("2", 140.0)],
            summary: None,
        });

        match gateway(&mock).invoke().await {
            Err(GatewayError::Prediction(message)) => {
                assert!(message.contains("attrition_probability[2]"))
            }
            other => panic!("Expected prediction error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_prediction_set_is_rejected() {
        let mock = MockAttritionServices::new().with_scoring(ScoringReport {
            records: Vec::new(),
            summary: None,
        });
        assert!(matches!(
            gateway(&mock).invoke().await,
            Err(GatewayError::Prediction(_))
        ));
    }

    #[tokio::test]
    async fn service_failure_is_reported() {
        let mock = MockAttritionServices::new()
            .with_scoring_error(ServiceError::rejected(500, "Model not loaded"));
        assert_eq!(
            gateway(&mock).invoke().await,
            Err(GatewayError::Prediction("Model not loaded".to_string()))
        );
    }

    #[test]
    fn cross_check_detects_disagreement() {
        let report = sample_scoring();
        let derived = RiskSummary::from_records(&report.records);
        assert!(PredictGateway::cross_check(&derived, &derived));

        let mut skewed = derived.clone();
        skewed.high_risk += 1;
        skewed.low_risk -= 1;
        assert!(!PredictGateway::cross_check(&skewed, &derived));
    }

    #[tokio::test]
    async fn disagreeing_upstream_summary_does_not_fail() {
        let mut report = sample_scoring();
        if let Some(summary) = report.summary.as_mut() {
            summary.high_risk = 0;
        }
        let mock = MockAttritionServices::new().with_scoring(report);
        assert!(gateway(&mock).invoke().await.is_ok());
    }
}
