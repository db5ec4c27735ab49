//! WorkflowEngine - the single source of truth for workflow progress.
//!
//! The engine owns the current stage and every stage payload, and exposes
//! only validated operations on them. It performs no I/O; gateways do the
//! external calls and report results through [`WorkflowEngine::advance`].

use serde::Serialize;

use crate::domain::foundation::{EmployeeId, StateMachine};
use crate::domain::risk::{EmployeeRecord, RecordDetail};

use super::{
    DatasetHandle, ExplorationSummary, ScoredDataset, Stage, Transition, WorkflowError,
};

/// Output of a completed stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StagePayload {
    Dataset(DatasetHandle),
    Exploration(ExplorationSummary),
    Scored(ScoredDataset),
    /// The record opened at Detail.
    Selection(EmployeeId),
}

impl StagePayload {
    /// Short name of the payload kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            StagePayload::Dataset(_) => "dataset",
            StagePayload::Exploration(_) => "exploration",
            StagePayload::Scored(_) => "scored",
            StagePayload::Selection(_) => "selection",
        }
    }

    /// The payload kind `stage` produces.
    pub fn expected_for(stage: Stage) -> &'static str {
        match stage {
            Stage::Upload => "dataset",
            Stage::Explore => "exploration",
            Stage::Predict => "scored",
            Stage::RiskTable => "selection",
            Stage::Detail => "none",
        }
    }
}

/// Proof that a caller started work while the engine was at `stage`.
///
/// A result obtained under a ticket may only be applied while the ticket is
/// still current (same stage, no retreat or reset in between).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StageTicket {
    pub stage: Stage,
    pub generation: u64,
}

/// Workflow progress and the payloads produced so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    stage: Stage,
    dataset: Option<DatasetHandle>,
    exploration: Option<ExplorationSummary>,
    scored: Option<ScoredDataset>,
    selected: Option<EmployeeId>,
}

impl WorkflowState {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn dataset(&self) -> Option<&DatasetHandle> {
        self.dataset.as_ref()
    }

    pub fn exploration(&self) -> Option<&ExplorationSummary> {
        self.exploration.as_ref()
    }

    pub fn scored(&self) -> Option<&ScoredDataset> {
        self.scored.as_ref()
    }

    pub fn selected_id(&self) -> Option<&EmployeeId> {
        self.selected.as_ref()
    }

    /// The selected record, resolved against the scored set.
    pub fn selected_record(&self) -> Option<&EmployeeRecord> {
        let id = self.selected.as_ref()?;
        self.scored.as_ref()?.find(id)
    }

    /// Classification and guidance for the selected record.
    pub fn selected_detail(&self) -> Option<RecordDetail> {
        self.selected_record().map(RecordDetail::of)
    }

    /// True if the payload owned by `stage` is populated.
    pub fn holds_result_of(&self, stage: Stage) -> bool {
        match stage {
            Stage::Upload => self.dataset.is_some(),
            Stage::Explore => self.exploration.is_some(),
            Stage::Predict => self.scored.is_some(),
            Stage::RiskTable => self.selected.is_some(),
            Stage::Detail => false,
        }
    }

    /// Checks the dependency chain between payloads and the stage.
    pub fn is_consistent(&self) -> bool {
        let chain_ok = (self.exploration.is_none() || self.dataset.is_some())
            && (self.scored.is_none() || self.exploration.is_some())
            && (self.selected.is_none() || self.selected_record().is_some());
        let stage_ok = Stage::all()
            .iter()
            .filter(|s| **s < self.stage)
            .all(|s| self.holds_result_of(*s));
        chain_ok && stage_ok
    }

    /// Drops payloads derived from `stage`'s result.
    fn clear_after(&mut self, stage: Stage) {
        if stage < Stage::Explore {
            self.exploration = None;
        }
        if stage < Stage::Predict {
            self.scored = None;
        }
        if stage < Stage::RiskTable {
            self.selected = None;
        }
    }
}

/// The workflow state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowEngine {
    state: WorkflowState,
    generation: u64,
}

impl WorkflowEngine {
    /// Creates an engine at `Upload` with nothing populated.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    /// Bumped on every retreat, forward and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Issues a ticket for work that will complete `stage`.
    pub fn ticket(&self, stage: Stage) -> Result<StageTicket, WorkflowError> {
        self.ensure_current(stage, Transition::Advance(stage))?;
        Ok(StageTicket {
            stage,
            generation: self.generation,
        })
    }

    /// True if a result obtained under `ticket` may still be applied.
    pub fn is_current(&self, ticket: &StageTicket) -> bool {
        ticket.generation == self.generation && ticket.stage == self.state.stage
    }

    /// Completes `stage` with its payload and moves to the next stage.
    ///
    /// Storing a payload discards the payloads of later stages, which were
    /// derived from the one being replaced.
    pub fn advance(&mut self, stage: Stage, payload: StagePayload) -> Result<Stage, WorkflowError> {
        self.ensure_current(stage, Transition::Advance(stage))?;
        let next = stage
            .next()
            .filter(|n| stage.can_transition_to(n))
            .ok_or(WorkflowError::IllegalTransition {
                current: self.state.stage,
                attempted: Transition::Advance(stage),
            })?;

        match (stage, payload) {
            (Stage::Upload, StagePayload::Dataset(dataset)) => {
                self.state.clear_after(stage);
                self.state.dataset = Some(dataset);
            }
            (Stage::Explore, StagePayload::Exploration(summary)) => {
                self.state.clear_after(stage);
                self.state.exploration = Some(summary);
            }
            (Stage::Predict, StagePayload::Scored(scored)) => {
                self.state.clear_after(stage);
                self.state.scored = Some(scored);
            }
            (Stage::RiskTable, StagePayload::Selection(id)) => {
                self.ensure_record(&id)?;
                self.state.selected = Some(id);
            }
            (stage, other) => {
                return Err(WorkflowError::PayloadMismatch {
                    stage,
                    expected: StagePayload::expected_for(stage),
                    actual: other.kind(),
                })
            }
        }

        self.state.stage = next;
        Ok(next)
    }

    /// Moves back to `target` (at most the current stage), keeping every
    /// payload so the user can move forward again without redoing work.
    pub fn retreat(&mut self, target: Stage) -> Result<Stage, WorkflowError> {
        let current = self.state.stage;
        if target == current {
            return Ok(current);
        }
        if !current.can_transition_to(&target) || target > current {
            return Err(WorkflowError::IllegalTransition {
                current,
                attempted: Transition::Retreat(target),
            });
        }

        self.state.stage = target;
        self.generation += 1;
        Ok(target)
    }

    /// Re-enters the next stage using the payload retained for the current one.
    ///
    /// Any call still running for the stage being left can no longer apply.
    pub fn forward(&mut self) -> Result<Stage, WorkflowError> {
        let current = self.state.stage;
        let next = current.next().ok_or(WorkflowError::IllegalTransition {
            current,
            attempted: Transition::Forward,
        })?;
        if !self.state.holds_result_of(current) {
            return Err(WorkflowError::NothingRetained(current));
        }

        self.state.stage = next;
        self.generation += 1;
        Ok(next)
    }

    /// Replaces the selected record without changing stage.
    ///
    /// Legal at `RiskTable` and `Detail` only.
    pub fn select(&mut self, id: EmployeeId) -> Result<(), WorkflowError> {
        let current = self.state.stage;
        if current < Stage::RiskTable {
            return Err(WorkflowError::IllegalTransition {
                current,
                attempted: Transition::Select,
            });
        }
        self.ensure_record(&id)?;
        self.state.selected = Some(id);
        Ok(())
    }

    /// Discards everything and returns to `Upload`.
    pub fn reset(&mut self) {
        self.state = WorkflowState::default();
        self.generation += 1;
    }

    /// True if the payload owned by `stage` is still held.
    pub fn retained(&self, stage: Stage) -> bool {
        self.state.holds_result_of(stage)
    }

    fn ensure_current(&self, stage: Stage, attempted: Transition) -> Result<(), WorkflowError> {
        if stage != self.state.stage {
            return Err(WorkflowError::IllegalTransition {
                current: self.state.stage,
                attempted,
            });
        }
        Ok(())
    }

    fn ensure_record(&self, id: &EmployeeId) -> Result<(), WorkflowError> {
        let scored = self
            .state
            .scored
            .as_ref()
            .ok_or(WorkflowError::StageUnavailable(Stage::Predict))?;
        if !scored.contains(id) {
            return Err(WorkflowError::UnknownRecord(id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::risk::EmployeeRecord;
    use crate::domain::workflow::DatasetFormat;
    use chrono::Utc;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    // ─────────────────────────────────────────────────────────────────────
    // Fixtures
    // ─────────────────────────────────────────────────────────────────────

    fn id(value: &str) -> EmployeeId {
        EmployeeId::new(value).unwrap()
    }

    fn dataset() -> StagePayload {
        StagePayload::Dataset(DatasetHandle {
            file_name: "staff.csv".to_string(),
            format: DatasetFormat::Csv,
            row_count: 3,
            columns: vec!["EmployeeNumber".to_string(), "Department".to_string()],
            preview_rows: Vec::new(),
            missing_value_counts: BTreeMap::new(),
            uploaded_at: Utc::now(),
        })
    }

    fn exploration() -> StagePayload {
        StagePayload::Exploration(ExplorationSummary {
            total_rows: 3,
            total_columns: 2,
            missing_values: BTreeMap::new(),
            charts: BTreeMap::new(),
            numerical: BTreeMap::new(),
            categorical: BTreeMap::new(),
        })
    }

    fn scored() -> StagePayload {
        let records = [("1", 20.0), ("2", 45.0), ("3", 80.0)]
            .iter()
            .map(|(i, p)| EmployeeRecord::new(id(i), "Sales", "Rep", *p))
            .collect();
        StagePayload::Scored(ScoredDataset::new(records).unwrap())
    }

    fn engine_at(stage: Stage) -> WorkflowEngine {
        let mut engine = WorkflowEngine::new();
        let steps = [
            (Stage::Upload, dataset()),
            (Stage::Explore, exploration()),
            (Stage::Predict, scored()),
            (Stage::RiskTable, StagePayload::Selection(id("3"))),
        ];
        for (s, payload) in steps {
            if engine.stage() == stage {
                break;
            }
            engine.advance(s, payload).unwrap();
        }
        engine
    }

    // ─────────────────────────────────────────────────────────────────────
    // advance
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn new_engine_starts_empty_at_upload() {
        let engine = WorkflowEngine::new();
        assert_eq!(engine.stage(), Stage::Upload);
        assert!(engine.state().dataset().is_none());
        assert!(engine.state().is_consistent());
    }

    #[test]
    fn advance_walks_the_whole_chain() {
        let engine = engine_at(Stage::Detail);
        assert_eq!(engine.stage(), Stage::Detail);
        assert_eq!(
            engine.state().selected_record().map(|r| r.attrition_probability),
            Some(80.0)
        );
        assert!(engine.state().is_consistent());
    }

    #[test]
    fn advance_rejects_skipping_ahead() {
        let mut engine = WorkflowEngine::new();
        let err = engine.advance(Stage::Predict, scored()).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::IllegalTransition {
                current: Stage::Upload,
                attempted: Transition::Advance(Stage::Predict),
            }
        );
        assert_eq!(engine.stage(), Stage::Upload);
    }

    #[test]
    fn advance_rejects_replaying_a_completed_stage() {
        let mut engine = engine_at(Stage::Predict);
        let err = engine.advance(Stage::Upload, dataset()).unwrap_err();
        assert!(matches!(err, WorkflowError::IllegalTransition { .. }));
    }

    #[test]
    fn every_non_current_stage_is_illegal() {
        for current in Stage::all() {
            let engine = engine_at(*current);
            for stage in Stage::all().iter().filter(|s| *s != current) {
                let mut attempt = engine.clone();
                let result = attempt.advance(*stage, dataset());
                assert!(
                    matches!(result, Err(WorkflowError::IllegalTransition { .. })),
                    "advance({}) at {} should be illegal",
                    stage,
                    current
                );
                assert_eq!(attempt, engine);
            }
        }
    }

    #[test]
    fn advance_from_detail_is_illegal() {
        let mut engine = engine_at(Stage::Detail);
        let err = engine
            .advance(Stage::Detail, StagePayload::Selection(id("1")))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::IllegalTransition { .. }));
    }

    #[test]
    fn advance_rejects_wrong_payload_kind() {
        let mut engine = WorkflowEngine::new();
        let err = engine.advance(Stage::Upload, exploration()).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::PayloadMismatch {
                stage: Stage::Upload,
                expected: "dataset",
                actual: "exploration",
            }
        );
        assert_eq!(engine.stage(), Stage::Upload);
    }

    #[test]
    fn selection_must_name_a_scored_record() {
        let mut engine = engine_at(Stage::RiskTable);
        let err = engine
            .advance(Stage::RiskTable, StagePayload::Selection(id("404")))
            .unwrap_err();
        assert_eq!(err, WorkflowError::UnknownRecord(id("404")));
        assert_eq!(engine.stage(), Stage::RiskTable);
    }

    #[test]
    fn new_upload_discards_downstream_payloads() {
        let mut engine = engine_at(Stage::Detail);
        engine.retreat(Stage::Upload).unwrap();
        engine.advance(Stage::Upload, dataset()).unwrap();
        assert!(engine.state().exploration().is_none());
        assert!(engine.state().scored().is_none());
        assert!(engine.state().selected_id().is_none());
        assert!(engine.state().is_consistent());
    }

    // ─────────────────────────────────────────────────────────────────────
    // retreat / forward / select
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn retreat_keeps_payloads() {
        let mut engine = engine_at(Stage::RiskTable);
        assert_eq!(engine.retreat(Stage::Explore), Ok(Stage::Explore));
        assert!(engine.state().scored().is_some());
        assert!(engine.state().is_consistent());
    }

    #[test]
    fn retreat_forward_is_illegal() {
        let mut engine = engine_at(Stage::Explore);
        let err = engine.retreat(Stage::RiskTable).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::IllegalTransition {
                current: Stage::Explore,
                attempted: Transition::Retreat(Stage::RiskTable),
            }
        );
    }

    #[test]
    fn retreat_bumps_generation_only_when_moving() {
        let mut engine = engine_at(Stage::Predict);
        let before = engine.generation();
        engine.retreat(Stage::Predict).unwrap();
        assert_eq!(engine.generation(), before);
        engine.retreat(Stage::Upload).unwrap();
        assert_eq!(engine.generation(), before + 1);
    }

    #[test]
    fn forward_reuses_retained_payloads() {
        let mut engine = engine_at(Stage::Detail);
        engine.retreat(Stage::Explore).unwrap();
        assert_eq!(engine.forward(), Ok(Stage::Predict));
        assert_eq!(engine.forward(), Ok(Stage::RiskTable));
        assert_eq!(engine.forward(), Ok(Stage::Detail));
        assert!(engine.state().is_consistent());
    }

    #[test]
    fn forward_invalidates_tickets_of_the_stage_left() {
        let mut engine = engine_at(Stage::Explore);
        engine.retreat(Stage::Upload).unwrap();
        let ticket = engine.ticket(Stage::Upload).unwrap();
        let before = engine.generation();

        engine.forward().unwrap();

        assert_eq!(engine.generation(), before + 1);
        assert!(!engine.is_current(&ticket));
    }

    #[test]
    fn forward_without_retained_payload_fails() {
        let mut engine = WorkflowEngine::new();
        assert_eq!(
            engine.forward(),
            Err(WorkflowError::NothingRetained(Stage::Upload))
        );
    }

    #[test]
    fn forward_from_detail_is_illegal() {
        let mut engine = engine_at(Stage::Detail);
        assert!(matches!(
            engine.forward(),
            Err(WorkflowError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn detail_and_risk_table_are_reversible() {
        let mut engine = engine_at(Stage::Detail);
        engine.retreat(Stage::RiskTable).unwrap();
        assert_eq!(engine.state().selected_id(), Some(&id("3")));
        engine.forward().unwrap();
        assert_eq!(engine.stage(), Stage::Detail);
    }

    #[test]
    fn select_swaps_record_at_detail_without_leaving() {
        let mut engine = engine_at(Stage::Detail);
        engine.select(id("1")).unwrap();
        assert_eq!(engine.stage(), Stage::Detail);
        assert_eq!(
            engine.state().selected_record().map(|r| r.employee_id.clone()),
            Some(id("1"))
        );
    }

    #[test]
    fn select_before_risk_table_is_illegal() {
        let mut engine = engine_at(Stage::Predict);
        assert!(matches!(
            engine.select(id("1")),
            Err(WorkflowError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn selected_detail_carries_guidance() {
        let engine = engine_at(Stage::Detail);
        let detail = engine.state().selected_detail().unwrap();
        assert_eq!(detail.record.employee_id, id("3"));
        assert!(!detail.classification.factors.is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────
    // reset / tickets
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn reset_clears_everything_from_any_stage() {
        for stage in Stage::all() {
            let mut engine = engine_at(*stage);
            let before = engine.generation();
            engine.reset();
            assert_eq!(engine.stage(), Stage::Upload);
            assert_eq!(engine.state(), &WorkflowState::default());
            assert_eq!(engine.generation(), before + 1);
        }
    }

    #[test]
    fn ticket_requires_current_stage() {
        let engine = engine_at(Stage::Explore);
        assert!(engine.ticket(Stage::Explore).is_ok());
        assert!(engine.ticket(Stage::Predict).is_err());
    }

    #[test]
    fn ticket_goes_stale_after_reset_or_advance() {
        let mut engine = engine_at(Stage::Predict);
        let ticket = engine.ticket(Stage::Predict).unwrap();
        assert!(engine.is_current(&ticket));

        let mut advanced = engine.clone();
        advanced.advance(Stage::Predict, scored()).unwrap();
        assert!(!advanced.is_current(&ticket));

        engine.reset();
        assert!(!engine.is_current(&ticket));
    }

    #[test]
    fn ticket_goes_stale_after_retreat_and_return() {
        let mut engine = engine_at(Stage::Predict);
        let ticket = engine.ticket(Stage::Predict).unwrap();
        engine.retreat(Stage::Explore).unwrap();
        engine.forward().unwrap();
        assert_eq!(engine.stage(), Stage::Predict);
        assert!(!engine.is_current(&ticket));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Invariant fuzzing
    // ─────────────────────────────────────────────────────────────────────

    #[derive(Debug, Clone)]
    enum Op {
        Advance(Stage, u8),
        Retreat(Stage),
        Forward,
        Select(u8),
        Reset,
    }

    fn payload(kind: u8) -> StagePayload {
        match kind % 5 {
            0 => dataset(),
            1 => exploration(),
            2 => scored(),
            3 => StagePayload::Selection(id("2")),
            _ => StagePayload::Selection(id("missing")),
        }
    }

    fn arb_stage() -> impl Strategy<Value = Stage> {
        prop::sample::select(Stage::all().to_vec())
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (arb_stage(), any::<u8>()).prop_map(|(s, k)| Op::Advance(s, k)),
            2 => arb_stage().prop_map(Op::Retreat),
            2 => Just(Op::Forward),
            1 => any::<u8>().prop_map(Op::Select),
            1 => Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn random_operations_preserve_invariants(ops in prop::collection::vec(arb_op(), 0..40)) {
            let mut engine = WorkflowEngine::new();
            for op in ops {
                let before = engine.clone();
                let ok = match op {
                    Op::Advance(stage, kind) => engine.advance(stage, payload(kind)).is_ok(),
                    Op::Retreat(stage) => engine.retreat(stage).is_ok(),
                    Op::Forward => engine.forward().is_ok(),
                    Op::Select(n) => engine.select(id(&(n % 4).to_string())).is_ok(),
                    Op::Reset => {
                        engine.reset();
                        true
                    }
                };
                prop_assert!(engine.state().is_consistent(), "inconsistent state: {:?}", engine);
                if !ok {
                    prop_assert_eq!(&engine, &before);
                }
            }
        }
    }
}
