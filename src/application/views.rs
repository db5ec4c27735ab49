//! Owned read models returned by `WorkflowSession`.

use serde::Serialize;

use crate::domain::foundation::{EmployeeId, SessionId};
use crate::domain::risk::{EmployeeRecord, RiskBucket, RiskSummary};
use crate::domain::risk_view::{RiskTable, VisibleStats};
use crate::domain::workflow::{DatasetHandle, Stage, WorkflowEngine};

/// Point-in-time view of the workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub session_id: SessionId,
    pub stage: Stage,
    pub generation: u64,
    pub dataset: Option<DatasetHandle>,
    pub has_exploration: bool,
    pub summary: Option<RiskSummary>,
    pub selected: Option<EmployeeId>,
    /// Stages with a service call outstanding.
    pub pending: Vec<Stage>,
}

impl WorkflowSnapshot {
    pub(crate) fn capture(session_id: SessionId, engine: &WorkflowEngine, pending: Vec<Stage>) -> Self {
        let state = engine.state();
        Self {
            session_id,
            stage: engine.stage(),
            generation: engine.generation(),
            dataset: state.dataset().cloned(),
            has_exploration: state.exploration().is_some(),
            summary: state.scored().map(|s| s.summary()),
            selected: state.selected_id().cloned(),
            pending,
        }
    }
}

/// One row of the risk table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRow {
    #[serde(flatten)]
    pub record: EmployeeRecord,
    pub risk_level: RiskBucket,
}

/// The filtered, ranked risk table with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskTableReport {
    pub rows: Vec<RiskRow>,
    pub stats: VisibleStats,
    /// Options for the department filter.
    pub departments: Vec<String>,
    /// Summary of the full scored set.
    pub summary: RiskSummary,
}

impl RiskTableReport {
    pub(crate) fn from_table(table: RiskTable<'_>, departments: Vec<String>, summary: RiskSummary) -> Self {
        let rows = table
            .rows
            .into_iter()
            .map(|record| RiskRow {
                risk_level: record.bucket(),
                record: record.clone(),
            })
            .collect();
        Self {
            rows,
            stats: table.stats,
            departments,
            summary,
        }
    }
}
