//! Workflow module - the staged Upload to Detail progression.
//!
//! `WorkflowEngine` owns the stage and every stage payload. Nothing else
//! mutates them; callers go through `advance`, `retreat`, `forward`,
//! `select` and `reset`.

mod dataset;
mod engine;
mod errors;
mod exploration;
mod scored;
mod stage;

pub use dataset::{DatasetFormat, DatasetHandle, PreviewRow, PREVIEW_ROWS};
pub use engine::{StagePayload, StageTicket, WorkflowEngine, WorkflowState};
pub use errors::{Transition, WorkflowError};
pub use exploration::{CategoricalSummary, ChartSeries, ExplorationSummary, NumericSummary};
pub use scored::ScoredDataset;
pub use stage::Stage;
