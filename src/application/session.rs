//! WorkflowSession - runs stage gateways against one WorkflowEngine.
//!
//! The engine sits behind a std mutex that is only held for synchronous
//! bookkeeping, never across an `.await`. Each service call runs on its own
//! task, which applies the result to the engine when the call finishes.
//! Callers await a shared handle to that task, so a caller that gives up
//! early does not lose the result, and a second identical request for a
//! stage whose call is still outstanding awaits the same task.
//!
//! Every call is started under a [`StageTicket`]. When the call finishes
//! the ticket is checked again; if the workflow moved in the meantime the
//! result is dropped and reported as `Superseded`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, warn};

use crate::domain::foundation::{EmployeeId, SessionId};
use crate::domain::risk::RecordDetail;
use crate::domain::risk_view::{FilterSpec, RiskView};
use crate::domain::workflow::{
    DatasetHandle, ExplorationSummary, ScoredDataset, Stage, StagePayload, StageTicket,
    WorkflowEngine, WorkflowError, WorkflowState,
};
use crate::ports::{ExplorationService, IngestionService, ScoringService, UploadFile};

use super::gateways::{ExploreGateway, GatewayError, PredictGateway, UploadGateway};
use super::views::{RiskTableReport, WorkflowSnapshot};

type StageResult = Result<StagePayload, GatewayError>;
type StageCall = Shared<BoxFuture<'static, StageResult>>;

/// Upload content fingerprint; explore and predict take no input.
type RequestKey = Option<[u8; 32]>;

/// An outstanding call, tagged with the generation it started in.
struct InFlight {
    generation: u64,
    request: RequestKey,
    call: StageCall,
}

struct Inner {
    engine: WorkflowEngine,
    in_flight: HashMap<Stage, InFlight>,
}

impl Inner {
    fn pending(&self) -> Vec<Stage> {
        let generation = self.engine.generation();
        let mut stages: Vec<Stage> = self
            .in_flight
            .iter()
            .filter(|(_, entry)| entry.generation == generation)
            .map(|(stage, _)| *stage)
            .collect();
        stages.sort();
        stages
    }
}

/// One user's pass through the attrition workflow.
pub struct WorkflowSession {
    id: SessionId,
    upload: UploadGateway,
    explore: ExploreGateway,
    predict: PredictGateway,
    inner: Arc<Mutex<Inner>>,
}

impl WorkflowSession {
    pub fn new(
        ingestion: Arc<dyn IngestionService>,
        exploration: Arc<dyn ExplorationService>,
        scoring: Arc<dyn ScoringService>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            upload: UploadGateway::new(ingestion),
            explore: ExploreGateway::new(exploration),
            predict: PredictGateway::new(scoring),
            inner: Arc::new(Mutex::new(Inner {
                engine: WorkflowEngine::new(),
                in_flight: HashMap::new(),
            })),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    // ─────────────────────────────────────────────────────────────────────
    // Gateway-backed stages
    // ─────────────────────────────────────────────────────────────────────

    /// Uploads a dataset and advances Upload → Explore.
    ///
    /// Always calls the ingestion service: a new file replaces the old one
    /// together with everything derived from it. While an upload is
    /// outstanding, the same file joins it and a different file is
    /// rejected with `InFlight`.
    pub async fn upload(&self, file: UploadFile) -> Result<DatasetHandle, GatewayError> {
        UploadGateway::check_format(&file)?;
        let request = Some(file.digest());
        let gateway = self.upload.clone();
        match self
            .run_stage(Stage::Upload, request, false, move || gateway.invoke(file))
            .await?
        {
            StagePayload::Dataset(dataset) => Ok(dataset),
            other => Err(mismatch(Stage::Upload, &other)),
        }
    }

    /// Fetches the exploration summary and advances Explore → Predict.
    ///
    /// A summary retained from before a retreat is reused without a call.
    pub async fn explore(&self) -> Result<ExplorationSummary, GatewayError> {
        let gateway = self.explore.clone();
        match self
            .run_stage(Stage::Explore, None, true, move || gateway.invoke())
            .await?
        {
            StagePayload::Exploration(summary) => Ok(summary),
            other => Err(mismatch(Stage::Explore, &other)),
        }
    }

    /// Scores the dataset and advances Predict → RiskTable.
    ///
    /// Scoring runs at most once per Predict entry.
    pub async fn predict(&self) -> Result<ScoredDataset, GatewayError> {
        let gateway = self.predict.clone();
        match self
            .run_stage(Stage::Predict, None, true, move || gateway.invoke())
            .await?
        {
            StagePayload::Scored(scored) => Ok(scored),
            other => Err(mismatch(Stage::Predict, &other)),
        }
    }

    async fn run_stage<F>(
        &self,
        stage: Stage,
        request: RequestKey,
        reuse_retained: bool,
        start: F,
    ) -> StageResult
    where
        F: FnOnce() -> BoxFuture<'static, StageResult>,
    {
        let call = {
            let mut inner = self.lock();
            let ticket = inner.engine.ticket(stage)?;

            if reuse_retained {
                if let Some(payload) = retained_payload(inner.engine.state(), stage) {
                    inner.engine.forward()?;
                    debug!(session_id = %self.id, %stage, "Reusing retained result");
                    return Ok(payload);
                }
            }

            let outstanding = inner
                .in_flight
                .get(&stage)
                .filter(|entry| entry.generation == ticket.generation)
                .map(|entry| (entry.request, entry.call.clone()));

            match outstanding {
                Some((running, _)) if running != request => {
                    debug!(session_id = %self.id, %stage, "Rejecting conflicting request");
                    return Err(GatewayError::InFlight { stage });
                }
                Some((_, call)) => {
                    debug!(session_id = %self.id, %stage, "Joining outstanding call");
                    call
                }
                None => {
                    debug!(
                        session_id = %self.id,
                        %stage,
                        generation = ticket.generation,
                        "Starting service call"
                    );
                    // Registered before the lock is released, so the task
                    // always finds its own entry when it applies.
                    let call = self.spawn_call(ticket, start());
                    inner.in_flight.insert(
                        stage,
                        InFlight {
                            generation: ticket.generation,
                            request,
                            call: call.clone(),
                        },
                    );
                    call
                }
            }
        };

        call.await
    }

    /// Runs `work` on its own task, which applies the result under `ticket`.
    fn spawn_call(&self, ticket: StageTicket, work: BoxFuture<'static, StageResult>) -> StageCall {
        let shared = Arc::clone(&self.inner);
        let session_id = self.id;
        let stage = ticket.stage;
        let handle = tokio::spawn(async move {
            let result = work.await;
            apply(&shared, session_id, ticket, result)
        });

        async move {
            handle.await.unwrap_or_else(|err| {
                warn!(%session_id, %stage, error = %err, "Stage call did not complete");
                Err(GatewayError::Aborted { stage })
            })
        }
        .boxed()
        .shared()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Synchronous operations
    // ─────────────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let inner = self.lock();
        WorkflowSnapshot::capture(self.id, &inner.engine, inner.pending())
    }

    /// The held exploration summary.
    pub fn exploration(&self) -> Result<ExplorationSummary, WorkflowError> {
        self.lock()
            .engine
            .state()
            .exploration()
            .cloned()
            .ok_or(WorkflowError::StageUnavailable(Stage::Explore))
    }

    /// Filters and ranks the scored records.
    pub fn risk_table(&self, filter: &FilterSpec) -> Result<RiskTableReport, WorkflowError> {
        let inner = self.lock();
        let scored = inner
            .engine
            .state()
            .scored()
            .ok_or(WorkflowError::StageUnavailable(Stage::Predict))?;

        let records = scored.records();
        let table = RiskView::apply(records, filter);
        Ok(RiskTableReport::from_table(
            table,
            RiskView::departments(records),
            scored.summary(),
        ))
    }

    /// Opens a record: RiskTable → Detail.
    pub fn show_detail(&self, id: EmployeeId) -> Result<RecordDetail, WorkflowError> {
        let mut inner = self.lock();
        inner
            .engine
            .advance(Stage::RiskTable, StagePayload::Selection(id))?;
        info!(session_id = %self.id, "Opened record detail");
        selected_detail(&inner.engine)
    }

    /// Replaces the selected record without changing stage.
    pub fn select(&self, id: EmployeeId) -> Result<RecordDetail, WorkflowError> {
        let mut inner = self.lock();
        inner.engine.select(id)?;
        selected_detail(&inner.engine)
    }

    /// The selected record with its classification and guidance.
    pub fn detail(&self) -> Result<RecordDetail, WorkflowError> {
        selected_detail(&self.lock().engine)
    }

    /// Moves forward using the result retained for the current stage.
    pub fn forward(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        let mut inner = self.lock();
        let next = inner.engine.forward()?;
        debug!(session_id = %self.id, to = %next, "Moved forward");
        Ok(WorkflowSnapshot::capture(self.id, &inner.engine, inner.pending()))
    }

    /// Moves back to `stage`, keeping every held result.
    pub fn retreat(&self, stage: Stage) -> Result<WorkflowSnapshot, WorkflowError> {
        let mut inner = self.lock();
        inner.engine.retreat(stage)?;
        info!(
            session_id = %self.id,
            to = %stage,
            generation = inner.engine.generation(),
            "Workflow retreated"
        );
        Ok(WorkflowSnapshot::capture(self.id, &inner.engine, inner.pending()))
    }

    /// Discards everything and returns to Upload.
    pub fn reset(&self) -> WorkflowSnapshot {
        let mut inner = self.lock();
        inner.engine.reset();
        inner.in_flight.clear();
        info!(
            session_id = %self.id,
            generation = inner.engine.generation(),
            "Workflow reset"
        );
        WorkflowSnapshot::capture(self.id, &inner.engine, Vec::new())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Applies a finished call, unless the workflow moved since it started.
fn apply(
    shared: &Mutex<Inner>,
    session_id: SessionId,
    ticket: StageTicket,
    result: StageResult,
) -> StageResult {
    let stage = ticket.stage;
    let mut inner = lock(shared);
    if matches!(inner.in_flight.get(&stage), Some(entry) if entry.generation == ticket.generation)
    {
        inner.in_flight.remove(&stage);
    }

    if !inner.engine.is_current(&ticket) {
        warn!(
            %session_id,
            %stage,
            ticket_generation = ticket.generation,
            generation = inner.engine.generation(),
            "Discarding result that arrived after the workflow moved on"
        );
        return Err(GatewayError::Superseded { stage });
    }

    let payload = result?;
    let next = inner.engine.advance(stage, payload.clone())?;
    info!(%session_id, from = %stage, to = %next, "Stage completed");
    Ok(payload)
}

fn retained_payload(state: &WorkflowState, stage: Stage) -> Option<StagePayload> {
    match stage {
        Stage::Upload => state.dataset().cloned().map(StagePayload::Dataset),
        Stage::Explore => state.exploration().cloned().map(StagePayload::Exploration),
        Stage::Predict => state.scored().cloned().map(StagePayload::Scored),
        Stage::RiskTable | Stage::Detail => None,
    }
}

fn selected_detail(engine: &WorkflowEngine) -> Result<RecordDetail, WorkflowError> {
    engine
        .state()
        .selected_detail()
        .ok_or(WorkflowError::StageUnavailable(Stage::RiskTable))
}

fn mismatch(stage: Stage, payload: &StagePayload) -> GatewayError {
    GatewayError::Workflow(WorkflowError::PayloadMismatch {
        stage,
        expected: StagePayload::expected_for(stage),
        actual: payload.kind(),
    })
}
