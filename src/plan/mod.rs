//! Planning stage: dependency staging, diff synthesis, and risk rollup.
//!
//! The planner never touches disk; it consumes the analyzer's results
//! read-only. Analysis saying an operation is not needed does not remove it
//! from the plan — the executor re-checks and short-circuits, so a plan
//! remains valid even when the workspace changes between plan and apply.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::registry::{HandlerCtx, OperationRegistry};
use crate::types::analysis::{AnalysisResult, Risk};
use crate::types::op::{ConfigAction, Operation, PlannedOperation};
use crate::types::plan::{ExecutionPlan, RiskAssessment};

mod diff;
mod stages;

/// Turns analyzed operations into a staged, diffed, risk-assessed plan.
#[derive(Debug)]
pub struct Planner<'r> {
    workspace_root: PathBuf,
    registry: Option<&'r OperationRegistry>,
}

impl<'r> Planner<'r> {
    pub fn new(workspace_root: &Path) -> Self {
        Self {
            workspace_root: workspace_root.to_path_buf(),
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: &'r OperationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn plan(
        &self,
        ops: &[PlannedOperation],
        analysis: &BTreeMap<String, AnalysisResult>,
    ) -> ExecutionPlan {
        let staged = stages::build_stages(ops);
        let mut warnings = staged.warnings;
        warn_root_pointer_ops(ops, &mut warnings);

        let ctx = HandlerCtx {
            workspace_root: &self.workspace_root,
        };
        let diff = diff::build_diff(ops, analysis, self.registry, &ctx);

        let mut by_operation = BTreeMap::new();
        for op in ops {
            let risk = analysis
                .get(op.id())
                .map(|a| a.risk)
                .unwrap_or(Risk::Moderate);
            by_operation.insert(op.id().to_string(), risk);
        }
        let overall = by_operation.values().copied().max().unwrap_or_default();

        ExecutionPlan {
            stages: staged.stages,
            diff,
            risks: RiskAssessment {
                overall,
                by_operation,
            },
            warnings,
        }
    }
}

/// Root `set`/`unset` are applied as no-ops; surface them here so callers see
/// why nothing will happen.
fn warn_root_pointer_ops(ops: &[PlannedOperation], warnings: &mut Vec<String>) {
    for op in ops {
        if let Operation::Config(c) = &op.operation {
            let root = c.pointer.is_empty() || c.pointer == "/";
            if root && matches!(c.action, ConfigAction::Set | ConfigAction::Unset) {
                warnings.push(format!(
                    "Operation {} targets the document root; set/unset at the root are no-ops.",
                    op.id()
                ));
            }
        }
    }
}
