//! api/analyze.rs — analysis stage wiring with per-operation facts.

use std::collections::BTreeMap;

use log::Level;
use serde_json::json;

use crate::analyze::Analyzer;
use crate::logging::audit::{AuditCtx, AuditMode, StageLogger};
use crate::logging::{AuditSink, FactsEmitter, TS_ZERO};
use crate::types::analysis::AnalysisResult;
use crate::types::ids::plan_id;
use crate::types::op::PlannedOperation;

pub(super) fn run<E: FactsEmitter, A: AuditSink>(
    api: &super::SetupEngine<E, A>,
    ops: &[PlannedOperation],
) -> BTreeMap<String, AnalysisResult> {
    api.audit.log(Level::Info, "analyze: starting");
    let analyzer = Analyzer::new(&api.workspace_root).with_registry(&api.registry);
    let results = analyzer.analyze_all(ops);

    // Analysis never mutates; facts are emitted redacted like a dry run.
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
    for op in ops {
        if let Some(res) = results.get(op.id()) {
            slog.analyze()
                .operation(op.id())
                .path(op.operation.target_path())
                .merge(json!({
                    "needed": res.needed,
                    "risk": res.risk,
                    "conflicts": res.conflicts.len(),
                }))
                .emit_success();
        }
    }
    api.audit.log(Level::Info, "analyze: finished");
    results
}
