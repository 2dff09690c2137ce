//! Core data model: operations, analysis, plans, reports, errors, safe paths.

pub mod analysis;
pub mod errors;
pub mod ids;
pub mod op;
pub mod plan;
pub mod report;
pub mod safepath;

pub use analysis::{AnalysisResult, Conflict, ConflictKind, Risk};
pub use errors::{Error, ErrorKind, Result};
pub use op::{
    CodeOp, ConfigAction, ConfigConflictResolution, ConfigOp, Encoding, FileAction, FileOp,
    MergeStrategy, Operation, OperationMetadata, PlannedOperation, ScriptAction,
    ScriptConflictResolution, ScriptOp, TemplateSpec, RAW_CONTENT_ANNOTATION,
};
pub use plan::{
    ApplyMode, ConfigDiff, DiffEntry, DiffSummary, ExecutionPlan, FileDiff, FilePreview,
    FileStatus, PlanDiff, RiskAssessment, Stage,
};
pub use report::{Artifacts, ExecutionResult, FailedOperation, ProgressEvent, ProgressStatus};
pub use safepath::SafePath;
