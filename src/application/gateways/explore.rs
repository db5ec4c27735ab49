//! ExploreGateway - fetches aggregates for the ingested dataset.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info, warn};

use crate::domain::workflow::{CategoricalSummary, ChartSeries, ExplorationSummary, StagePayload};
use crate::ports::{ExplorationReport, ExplorationService, RawSeries};

use super::GatewayError;

/// Gateway for the Explore stage. Never retries.
#[derive(Clone)]
pub struct ExploreGateway {
    service: Arc<dyn ExplorationService>,
}

impl ExploreGateway {
    pub fn new(service: Arc<dyn ExplorationService>) -> Self {
        Self { service }
    }

    pub fn invoke(&self) -> BoxFuture<'static, Result<StagePayload, GatewayError>> {
        let service = Arc::clone(&self.service);
        async move {
            debug!("Requesting exploration summary");
            let report = service.explore().await.map_err(|err| {
                warn!(error = %err, "Exploration failed");
                GatewayError::Exploration(err.to_string())
            })?;

            let summary = Self::to_summary(report)?;
            info!(
                rows = summary.total_rows,
                columns = summary.total_columns,
                charts = summary.charts.len(),
                "Exploration summary received"
            );
            Ok(StagePayload::Exploration(summary))
        }
        .boxed()
    }

    fn to_summary(report: ExplorationReport) -> Result<ExplorationSummary, GatewayError> {
        let charts = report
            .charts
            .into_iter()
            .map(|(name, raw)| Ok((name.clone(), Self::series(&name, raw)?)))
            .collect::<Result<BTreeMap<_, _>, GatewayError>>()?;

        let categorical = report
            .categorical
            .into_iter()
            .map(|(name, raw)| {
                let series = Self::series(&name, raw.series)?;
                Ok((
                    name,
                    CategoricalSummary {
                        unique: raw.unique,
                        series,
                    },
                ))
            })
            .collect::<Result<BTreeMap<_, _>, GatewayError>>()?;

        Ok(ExplorationSummary {
            total_rows: report.total_rows,
            total_columns: report.total_columns,
            missing_values: report.missing_values,
            charts,
            numerical: report.numerical,
            categorical,
        })
    }

    fn series(name: &str, raw: RawSeries) -> Result<ChartSeries, GatewayError> {
        ChartSeries::new(raw.labels, raw.values)
            .map_err(|err| GatewayError::Exploration(format!("Chart '{}': {}", name, err)))
    }
}
