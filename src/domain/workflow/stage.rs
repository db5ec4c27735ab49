//! Stage enum - the five ordered steps of the attrition workflow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Workflow stage. Declaration order is the workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Upload,
    Explore,
    Predict,
    RiskTable,
    Detail,
}

impl Stage {
    /// Returns all stages in canonical order.
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Upload,
            Stage::Explore,
            Stage::Predict,
            Stage::RiskTable,
            Stage::Detail,
        ]
    }

    /// Returns the 0-based index of this stage in the canonical order.
    pub fn order_index(&self) -> usize {
        *self as usize
    }

    /// Returns the next stage in order, if any.
    pub fn next(&self) -> Option<Stage> {
        Self::all().get(self.order_index() + 1).copied()
    }
}

/// Forward by one step, or backward to any earlier stage.
impl StateMachine for Stage {
    fn can_transition_to(&self, target: &Self) -> bool {
        target < self || self.next() == Some(*target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|target| self.can_transition_to(target))
            .collect()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Upload => "Upload",
            Stage::Explore => "Explore",
            Stage::Predict => "Predict",
            Stage::RiskTable => "RiskTable",
            Stage::Detail => "Detail",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Stage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "upload" => Ok(Stage::Upload),
            "explore" => Ok(Stage::Explore),
            "predict" => Ok(Stage::Predict),
            "risktable" => Ok(Stage::RiskTable),
            "detail" => Ok(Stage::Detail),
            _ => Err(ValidationError::invalid_format(
                "stage",
                format!("unknown stage '{}'", s),
            )),
        }
    }
}
