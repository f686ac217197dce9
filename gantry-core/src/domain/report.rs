//! Application report domain types
//!
//! Read-only snapshots of a scheduled application as reported by the cluster
//! scheduler. Reports are polled repeatedly and never mutated by Gantry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheduler-native final status of an application.
///
/// `Undefined` covers everything non-terminal (queued and actively running
/// alike). Unrecognized wire values are preserved in `Other` so the status
/// translator can fail with the offending text instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinalStatus {
    Undefined,
    Succeeded,
    Failed,
    Killed,
    Other(String),
}

impl FinalStatus {
    /// Whether the application will not change state further
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FinalStatus::Undefined)
    }
}

impl From<String> for FinalStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "UNDEFINED" => FinalStatus::Undefined,
            "SUCCEEDED" => FinalStatus::Succeeded,
            "FAILED" => FinalStatus::Failed,
            "KILLED" => FinalStatus::Killed,
            _ => FinalStatus::Other(value),
        }
    }
}

impl From<FinalStatus> for String {
    fn from(status: FinalStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalStatus::Undefined => write!(f, "UNDEFINED"),
            FinalStatus::Succeeded => write!(f, "SUCCEEDED"),
            FinalStatus::Failed => write!(f, "FAILED"),
            FinalStatus::Killed => write!(f, "KILLED"),
            FinalStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Snapshot of an application's state as reported by the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationReport {
    /// Application id assigned by the scheduler
    pub id: String,

    /// Free-form native lifecycle state (e.g. "ACCEPTED", "RUNNING")
    pub state: String,

    /// Terminal outcome, `Undefined` until the application finishes
    pub final_status: FinalStatus,

    pub queue: String,
    pub user: String,
    pub tracking_url: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub finish_time: Option<DateTime<Utc>>,
}

impl ApplicationReport {
    /// Renders the report as a block of right-aligned `name: value` lines.
    ///
    /// Logged by the wait loop whenever the native state changes.
    pub fn summary(&self) -> String {
        let rows: [(&str, String); 6] = [
            ("queue", self.queue.clone()),
            (
                "start_time",
                self.start_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
            ),
            (
                "finish_time",
                self.finish_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
            ),
            ("final_status", self.final_status.to_string()),
            (
                "tracking_url",
                self.tracking_url.clone().unwrap_or_default(),
            ),
            ("user", self.user.clone()),
        ];

        let mut out = String::new();
        for (name, value) in rows {
            out.push('\n');
            out.push_str(&format!("{:>16}: {}", name, value));
        }
        out
    }
}
