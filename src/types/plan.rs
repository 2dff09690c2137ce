//! Plan types: dependency stages, workspace diff, and risk rollup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::analysis::Risk;
use super::op::PlannedOperation;

/// Mode for executing a plan.
///
/// - `DryRun`: resolve content and consult simulators; do not mutate.
/// - `Commit`: perform mutations with backups and journal capture.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ApplyMode {
    #[default]
    DryRun,
    Commit,
}

impl ApplyMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, ApplyMode::DryRun)
    }
}

/// One level of the dependency topological sort. Operations within a stage
/// are mutually independent; `parallel` is advisory only, the executor runs
/// everything sequentially.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub operations: Vec<PlannedOperation>,
    pub parallel: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Created,
    Modified,
    Deleted,
}

/// Before/after content preview for a file diff. `after` is absent on delete
/// and when the content is not previewable (e.g. raw annotation bytes).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilePreview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileDiff {
    pub path: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<FilePreview>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigDiff {
    pub path: String,
    pub pointer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
}

/// A diff entry produced by a registry diff builder; built-ins only emit
/// file and config shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffEntry {
    File(FileDiff),
    Config(ConfigDiff),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub created: usize,
    pub modified: usize,
    pub deleted: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDiff {
    pub files: Vec<FileDiff>,
    pub configs: Vec<ConfigDiff>,
    pub summary: DiffSummary,
}

/// Risk rollup: `overall` is the max of `by_operation` under
/// `Safe < Moderate < High`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub overall: Risk,
    pub by_operation: BTreeMap<String, Risk>,
}

/// Ordered stages plus the synthesized diff, risk rollup, and warnings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub stages: Vec<Stage>,
    pub diff: PlanDiff,
    pub risks: RiskAssessment,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExecutionPlan {
    /// Operations in execution order, flattened across stages.
    pub fn operations(&self) -> impl Iterator<Item = &PlannedOperation> {
        self.stages.iter().flat_map(|s| s.operations.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
