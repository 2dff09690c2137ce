//! api/apply.rs — apply stage wiring: executor, journal, per-operation facts,
//! and rollback telemetry.

use log::Level;
use serde_json::json;

use crate::exec::Executor;
use crate::journal::Journal;
use crate::logging::audit::{AuditCtx, AuditMode, StageLogger};
use crate::logging::{ts_for_mode, AuditSink, FactsEmitter};
use crate::types::ids::plan_id;
use crate::types::plan::{ApplyMode, ExecutionPlan};
use crate::types::report::{ExecutionResult, ProgressStatus};

pub(super) fn run<E: FactsEmitter, A: AuditSink>(
    api: &super::SetupEngine<E, A>,
    plan: &ExecutionPlan,
    journal: &mut dyn Journal,
    mode: ApplyMode,
) -> ExecutionResult {
    let dry = mode.is_dry_run();
    let ops: Vec<_> = plan.operations().cloned().collect();
    let tctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        plan_id(&ops).to_string(),
        ts_for_mode(mode),
        AuditMode {
            dry_run: dry,
            redact: dry,
        },
    );

    api.audit.log(Level::Info, "apply: starting");
    StageLogger::new(&tctx)
        .apply_attempt()
        .field("operations", json!(ops.len()))
        .emit_success();

    // Per-operation facts ride on the executor's progress stream.
    let progress = |ev: &crate::types::report::ProgressEvent| {
        let slog = StageLogger::new(&tctx);
        match ev.status {
            ProgressStatus::Pending | ProgressStatus::Running => slog
                .apply_attempt()
                .operation(ev.operation.id())
                .path(ev.operation.operation.target_path())
                .field("stage_id", json!(ev.stage_id))
                .emit_success(),
            ProgressStatus::Completed | ProgressStatus::Skipped => slog
                .apply_result()
                .operation(ev.operation.id())
                .path(ev.operation.operation.target_path())
                .field("stage_id", json!(ev.stage_id))
                .field("skipped", json!(ev.status == ProgressStatus::Skipped))
                .emit_success(),
            ProgressStatus::Failed => slog
                .apply_result()
                .operation(ev.operation.id())
                .path(ev.operation.operation.target_path())
                .field("stage_id", json!(ev.stage_id))
                .field("error", json!(ev.error))
                .emit_failure(),
        }
    };

    let executor = Executor::new(&api.workspace_root)
        .with_backup_dir(api.backup_dir.clone())
        .with_registry(&api.registry)
        .with_auto_confirm(api.auto_confirm)
        .with_progress(&progress);
    let result = executor.execute(plan, journal, mode);

    let slog = StageLogger::new(&tctx);
    if result.success {
        slog.apply_result()
            .merge(json!({
                "applied": result.applied.len(),
                "log_path": result.log_path.clone(),
                "duration_ms": result.duration_ms,
            }))
            .emit_success();
        api.audit.log(Level::Info, "apply: finished");
    } else {
        if !dry {
            for op in result.applied.iter().rev() {
                StageLogger::new(&tctx)
                    .rollback()
                    .operation(op.id())
                    .path(op.operation.target_path())
                    .emit_success();
            }
            StageLogger::new(&tctx)
                .rollback_summary()
                .merge(json!({
                    "rolled_back": result.applied.len(),
                    "errors": result.rollback_errors.len(),
                }))
                .emit(if result.rollback_errors.is_empty() {
                    crate::logging::audit::Decision::Success
                } else {
                    crate::logging::audit::Decision::Failure
                });
        }
        slog.apply_result()
            .merge(json!({
                "error": result.failed.first().map(|f| f.error.clone()),
                "duration_ms": result.duration_ms,
            }))
            .emit_failure();
        api.audit.log(Level::Error, "apply: failed; mutations rolled back");
    }
    result
}
