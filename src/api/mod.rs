// Facade for the setup pipeline; delegates to stage submodules under src/api/

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_BACKUP_SUBDIR, DEFAULT_SNAPSHOT_CONTENT_CAP};
use crate::journal::{FsJournal, Journal};
use crate::logging::{AuditSink, FactsEmitter};
use crate::registry::OperationRegistry;
use crate::types::analysis::AnalysisResult;
use crate::types::op::PlannedOperation;
use crate::types::plan::{ApplyMode, ExecutionPlan};
use crate::types::report::ExecutionResult;

mod analyze;
mod apply;
mod plan;

/// One engine instance per workspace: wires the analyzer, planner, and
/// executor together and emits a structured fact per stage.
pub struct SetupEngine<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    workspace_root: PathBuf,
    backup_dir: PathBuf,
    registry: OperationRegistry,
    auto_confirm: bool,
    snapshot_cap: usize,
}

impl<E: FactsEmitter, A: AuditSink> SetupEngine<E, A> {
    pub fn new(facts: E, audit: A, workspace_root: &Path) -> Self {
        Self {
            facts,
            audit,
            workspace_root: workspace_root.to_path_buf(),
            backup_dir: workspace_root.join(DEFAULT_BACKUP_SUBDIR),
            registry: OperationRegistry::new(),
            auto_confirm: false,
            snapshot_cap: DEFAULT_SNAPSHOT_CONTENT_CAP,
        }
    }

    pub fn with_backup_dir(mut self, dir: PathBuf) -> Self {
        self.backup_dir = dir;
        self
    }

    pub fn with_registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Resolve `prompt`-style conflicts without interaction.
    pub fn with_auto_confirm(mut self, yes: bool) -> Self {
        self.auto_confirm = yes;
        self
    }

    /// Cap journal snapshot content at `bytes`.
    pub fn with_snapshot_cap(mut self, bytes: usize) -> Self {
        self.snapshot_cap = bytes;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn registry_mut(&mut self) -> &mut OperationRegistry {
        &mut self.registry
    }

    /// Inspect current workspace state for every operation.
    pub fn analyze(&self, ops: &[PlannedOperation]) -> BTreeMap<String, AnalysisResult> {
        analyze::run(self, ops)
    }

    /// Stage, diff, and risk-assess analyzed operations.
    pub fn plan(
        &self,
        ops: &[PlannedOperation],
        analysis: &BTreeMap<String, AnalysisResult>,
    ) -> ExecutionPlan {
        plan::run(self, ops, analysis)
    }

    /// Apply a plan with a fresh snapshot-capturing journal.
    pub fn apply(&self, plan: &ExecutionPlan, mode: ApplyMode) -> ExecutionResult {
        let mut journal = FsJournal::new(&self.workspace_root).with_content_cap(self.snapshot_cap);
        apply::run(self, plan, &mut journal, mode)
    }

    /// Apply a plan against a caller-supplied journal (e.g. a `MemoryJournal`
    /// in tests, or a journal shared across several plans).
    pub fn apply_with_journal(
        &self,
        plan: &ExecutionPlan,
        journal: &mut dyn Journal,
        mode: ApplyMode,
    ) -> ExecutionResult {
        apply::run(self, plan, journal, mode)
    }
}
