//! Execution reports and progress events.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::op::PlannedOperation;

/// An operation that failed to apply, with the error it raised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FailedOperation {
    pub operation: PlannedOperation,
    pub error: String,
}

/// Artifacts produced by a run: backup payloads and persisted logs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    pub backups: Vec<PathBuf>,
    pub logs: Vec<PathBuf>,
}

#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    /// Operations that actually changed the workspace, in apply order.
    pub applied: Vec<PlannedOperation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedOperation>,
    /// False only for dry runs; committed runs always leave a replayable
    /// journal behind.
    pub rollback_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    pub artifacts: Artifacts,
    /// Best-effort failures while undoing mutations; empty on clean runs and
    /// clean rollbacks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rollback_errors: Vec<String>,
    pub duration_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Pending,
    Running,
    Completed,
    Skipped,
    Failed,
}

/// Emitted through the executor's opt-in callback once per status change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub stage_id: String,
    pub operation: PlannedOperation,
    pub status: ProgressStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
