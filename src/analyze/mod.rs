//! Analysis stage: per-operation inspection of the workspace.
//!
//! Strictly sequential, no caching across runs. For each operation the
//! registry is consulted first; otherwise the built-in rules for
//! `file`/`config`/`script` run. Kinds with neither a registered nor a
//! built-in analyzer (notably `code`) are recorded as risk=moderate with an
//! explanatory note so the plan still surfaces them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::registry::{HandlerCtx, OperationRegistry};
use crate::types::analysis::{AnalysisResult, Risk};
use crate::types::op::{Operation, PlannedOperation};

mod config;
mod file;
mod script;

pub(crate) use config::analyze_config;
pub(crate) use file::analyze_file;
pub(crate) use script::analyze_script;

/// Inspects current workspace state and classifies operations as
/// needed / not needed.
#[derive(Debug)]
pub struct Analyzer<'r> {
    workspace_root: PathBuf,
    registry: Option<&'r OperationRegistry>,
}

impl<'r> Analyzer<'r> {
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

    /// Analyze every operation, keyed by operation id.
    pub fn analyze_all(&self, ops: &[PlannedOperation]) -> BTreeMap<String, AnalysisResult> {
        let mut out = BTreeMap::new();
        for op in ops {
            out.insert(op.id().to_string(), self.analyze_one(op));
        }
        out
    }

    pub fn analyze_one(&self, op: &PlannedOperation) -> AnalysisResult {
        let ctx = HandlerCtx {
            workspace_root: &self.workspace_root,
        };
        if let Some(handler) = self
            .registry
            .and_then(|r| r.analyzer(op.operation.kind()))
        {
            return handler.analyze(op, &ctx);
        }
        match &op.operation {
            Operation::File(f) => analyze_file(f, &self.workspace_root),
            Operation::Config(c) => analyze_config(c, &self.workspace_root),
            Operation::Script(s) => analyze_script(s, &self.workspace_root),
            Operation::Code(_) => AnalysisResult::needed(Risk::Moderate).with_note(format!(
                "no built-in analyzer for kind '{}'; execution will fail unless a handler is registered",
                op.operation.kind()
            )),
        }
    }
}
