//! Diff synthesis: per-operation workspace diff entries and the rollup
//! summary. Registry diff builders are consulted first; built-ins cover the
//! `file` and `config` kinds.

use serde_json::Value;

use crate::registry::{HandlerCtx, OperationRegistry};
use crate::types::analysis::AnalysisResult;
use crate::types::op::{ConfigAction, ConfigOp, FileAction, FileOp, Operation, PlannedOperation};
use crate::types::plan::{
    ConfigDiff, DiffEntry, DiffSummary, FileDiff, FilePreview, FileStatus, PlanDiff,
};

pub(crate) fn build_diff(
    ops: &[PlannedOperation],
    analysis: &std::collections::BTreeMap<String, AnalysisResult>,
    registry: Option<&OperationRegistry>,
    ctx: &HandlerCtx<'_>,
) -> PlanDiff {
    let mut diff = PlanDiff::default();
    for op in ops {
        let res = analysis.get(op.id());
        let entry = registry
            .and_then(|r| r.diff_builder(op.operation.kind()))
            .and_then(|b| b.build_diff(op, res, ctx))
            .or_else(|| builtin_entry(op, res));
        match entry {
            Some(DiffEntry::File(f)) => diff.files.push(f),
            Some(DiffEntry::Config(c)) => diff.configs.push(c),
            None => {}
        }
    }
    diff.summary = summarize(&diff);
    diff
}

fn builtin_entry(op: &PlannedOperation, analysis: Option<&AnalysisResult>) -> Option<DiffEntry> {
    match &op.operation {
        Operation::File(f) => Some(DiffEntry::File(file_diff(f, analysis))),
        Operation::Config(c) => Some(DiffEntry::Config(config_diff(c, analysis))),
        // Scripts and code have no built-in diff shape; a registry builder
        // may supply one.
        Operation::Script(_) | Operation::Code(_) => None,
    }
}

fn file_diff(op: &FileOp, analysis: Option<&AnalysisResult>) -> FileDiff {
    let current_exists = analysis
        .and_then(|a| a.current.as_ref())
        .and_then(|c| c.get("exists"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let status = match op.action {
        FileAction::Delete => FileStatus::Deleted,
        _ if !current_exists => FileStatus::Created,
        _ => FileStatus::Modified,
    };

    let before = analysis
        .and_then(|a| a.current.as_ref())
        .and_then(|c| c.get("content"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let after = match op.action {
        FileAction::Delete => None,
        _ => op.content.clone().or_else(|| {
            op.template
                .as_ref()
                .map(|t| format!("{{{{template:{}}}}}", t.source))
        }),
    };

    FileDiff {
        path: op.path.clone(),
        status,
        preview: Some(FilePreview { before, after }),
    }
}

fn config_diff(op: &ConfigOp, analysis: Option<&AnalysisResult>) -> ConfigDiff {
    ConfigDiff {
        path: op.path.clone(),
        pointer: op.pointer.clone(),
        before: analysis.and_then(|a| a.current.clone()),
        after: match op.action {
            ConfigAction::Unset => None,
            ConfigAction::Set | ConfigAction::Merge => op.value.clone(),
        },
    }
}

fn summarize(diff: &PlanDiff) -> DiffSummary {
    let mut summary = DiffSummary::default();
    for f in &diff.files {
        match f.status {
            FileStatus::Created => summary.created += 1,
            FileStatus::Modified => summary.modified += 1,
            FileStatus::Deleted => summary.deleted += 1,
        }
    }
    for c in &diff.configs {
        match (&c.before, &c.after) {
            (None, Some(_)) => summary.created += 1,
            (_, None) => summary.deleted += 1,
            _ => summary.modified += 1,
        }
    }
    summary
}
