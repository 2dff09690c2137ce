//! api/plan.rs — planning stage wiring with per-operation facts.

use std::collections::BTreeMap;

use log::Level;
use serde_json::json;

use crate::logging::audit::{AuditCtx, AuditMode, StageLogger};
use crate::logging::{AuditSink, FactsEmitter, TS_ZERO};
use crate::plan::Planner;
use crate::types::analysis::AnalysisResult;
use crate::types::ids::plan_id;
use crate::types::op::PlannedOperation;
use crate::types::plan::ExecutionPlan;

pub(super) fn run<E: FactsEmitter, A: AuditSink>(
    api: &super::SetupEngine<E, A>,
    ops: &[PlannedOperation],
    analysis: &BTreeMap<String, AnalysisResult>,
) -> ExecutionPlan {
    let planner = Planner::new(&api.workspace_root).with_registry(&api.registry);
    let plan = planner.plan(ops, analysis);

    let tctx = AuditCtx::new(
        &api.facts as &dyn FactsEmitter,
        plan_id(ops).to_string(),
        TS_ZERO.to_string(),
        AuditMode {
            dry_run: true,
            redact: true,
        },
    );
    let slog = StageLogger::new(&tctx);
    for stage in &plan.stages {
        for op in &stage.operations {
            slog.plan()
                .operation(op.id())
                .path(op.operation.target_path())
                .field("stage_id", json!(stage.id))
                .emit_success();
        }
    }
    for warning in &plan.warnings {
        api.audit.log(Level::Warn, &format!("plan: {warning}"));
        slog.plan().field("warning", json!(warning)).emit_warn();
    }
    slog.plan()
        .merge(json!({
            "stages": plan.stages.len(),
            "summary": plan.diff.summary,
            "risk": plan.risks.overall,
        }))
        .emit_success();
    plan
}
