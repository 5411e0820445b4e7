//! Workflow run types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a workflow run as reported by the execution service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Pending,
    Starting,
    Running,
    Stopping,
    Completed,
    Deleted,
    Cancelled,
    Failed,
    Unknown(String),
}

impl RunStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Pending => "PENDING",
            RunStatus::Starting => "STARTING",
            RunStatus::Running => "RUNNING",
            RunStatus::Stopping => "STOPPING",
            RunStatus::Completed => "COMPLETED",
            RunStatus::Deleted => "DELETED",
            RunStatus::Cancelled => "CANCELLED",
            RunStatus::Failed => "FAILED",
            RunStatus::Unknown(value) => value,
        }
    }

    /// Whether the run can no longer change status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Deleted | RunStatus::Cancelled | RunStatus::Failed
        )
    }
}

impl From<String> for RunStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => RunStatus::Pending,
            "STARTING" => RunStatus::Starting,
            "RUNNING" => RunStatus::Running,
            "STOPPING" => RunStatus::Stopping,
            "COMPLETED" => RunStatus::Completed,
            "DELETED" => RunStatus::Deleted,
            "CANCELLED" => RunStatus::Cancelled,
            "FAILED" => RunStatus::Failed,
            _ => RunStatus::Unknown(value),
        }
    }
}

impl From<&str> for RunStatus {
    fn from(value: &str) -> Self {
        RunStatus::from(value.to_string())
    }
}

impl From<RunStatus> for String {
    fn from(value: RunStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle returned after a successful submission
///
/// The execution service stays authoritative for status; the handle is a
/// snapshot taken at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunHandle {
    pub run_id: String,
    pub status: RunStatus,
    pub output_uri: String,
}

/// Run details returned by a status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub status: RunStatus,
    pub name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub stop_time: Option<DateTime<Utc>>,
    pub output_uri: Option<String>,
    pub status_message: Option<String>,
}

impl RunRecord {
    /// Creates a record carrying only an id and status
    pub fn new(run_id: impl Into<String>, status: RunStatus) -> Self {
        Self {
            run_id: run_id.into(),
            status,
            name: None,
            start_time: None,
            stop_time: None,
            output_uri: None,
            status_message: None,
        }
    }
}
