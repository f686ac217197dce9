//! Run status domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniform run status, recomputed on each poll from the scheduler-native state.
///
/// `Scheduled` and `Running` are both reported by the scheduler as an
/// undefined final status; polling collapses them to `Running` until a
/// terminal status is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Scheduled,
    Running,
    Finished,
    Failed,
    Killed,
}

impl RunStatus {
    /// Whether the run can still change state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunStatus::Scheduled | RunStatus::Running)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Scheduled => "SCHEDULED",
            RunStatus::Running => "RUNNING",
            RunStatus::Finished => "FINISHED",
            RunStatus::Failed => "FAILED",
            RunStatus::Killed => "KILLED",
        };
        write!(f, "{}", s)
    }
}
