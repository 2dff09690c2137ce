//! Apply stage: executes a plan transactionally.
//!
//! Side-effects:
//! - Mutates workspace files through the per-kind appliers, backing up any
//!   pre-existing target before overwrite or delete.
//! - Feeds the change journal (`before_operation` / `after_operation`) and
//!   persists it to `<backup_dir>/<unix-ms>-setup-log.json` on success.
//! - Emits opt-in progress events per operation.
//! - On the first failure, rolls the mutation log back in reverse order and
//!   returns the partially-applied list.
//!
//! Execution is sequential across stages and within a stage; the `parallel`
//! flag on stages is advisory only.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::constants::{DEFAULT_BACKUP_SUBDIR, LOG_FILE_SUFFIX};
use crate::fs::backup::unix_millis;
use crate::journal::{self, Journal};
use crate::registry::{ExecCtx, ExecOutcome, OperationRegistry};
use crate::types::errors::{Error, ErrorKind, Result};
use crate::types::op::{Operation, PlannedOperation};
use crate::types::plan::{ApplyMode, ExecutionPlan};
use crate::types::report::{ExecutionResult, FailedOperation, ProgressEvent, ProgressStatus};

mod config;
mod content;
mod file;
mod rollback;
mod script;

use rollback::MutationLog;

/// Applies plans against one workspace root.
pub struct Executor<'r> {
    workspace_root: PathBuf,
    backup_dir: PathBuf,
    registry: Option<&'r OperationRegistry>,
    auto_confirm: bool,
    progress: Option<&'r dyn Fn(&ProgressEvent)>,
}

impl<'r> Executor<'r> {
    pub fn new(workspace_root: &Path) -> Self {
        Self {
            workspace_root: workspace_root.to_path_buf(),
            backup_dir: workspace_root.join(DEFAULT_BACKUP_SUBDIR),
            registry: None,
            auto_confirm: false,
            progress: None,
        }
    }

    pub fn with_backup_dir(mut self, dir: PathBuf) -> Self {
        self.backup_dir = dir;
        self
    }

    pub fn with_registry(mut self, registry: &'r OperationRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Resolve `prompt`-style conflicts without interaction.
    pub fn with_auto_confirm(mut self, yes: bool) -> Self {
        self.auto_confirm = yes;
        self
    }

    pub fn with_progress(mut self, callback: &'r dyn Fn(&ProgressEvent)) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn execute(
        &self,
        plan: &ExecutionPlan,
        journal: &mut dyn Journal,
        mode: ApplyMode,
    ) -> ExecutionResult {
        let t0 = Instant::now();
        let dry = mode.is_dry_run();
        let mut mutations = MutationLog::default();
        let mut applied: Vec<PlannedOperation> = Vec::new();
        let ctx = ExecCtx {
            workspace_root: &self.workspace_root,
            backup_dir: &self.backup_dir,
            auto_confirm: self.auto_confirm,
        };

        for stage in &plan.stages {
            if !dry {
                journal.start_stage(&stage.id);
            }
            for op in &stage.operations {
                let start_status = if dry {
                    ProgressStatus::Pending
                } else {
                    ProgressStatus::Running
                };
                self.emit_progress(&stage.id, op, start_status, None);

                let step = if dry {
                    self.simulate_one(op, &ctx).map(|()| None)
                } else {
                    self.apply_one(op, &ctx, journal, &mut mutations).map(Some)
                };

                match step {
                    Ok(Some(outcome)) => {
                        if outcome.changed {
                            applied.push(op.clone());
                        }
                        self.emit_progress(&stage.id, op, ProgressStatus::Completed, None);
                    }
                    Ok(None) => {
                        self.emit_progress(&stage.id, op, ProgressStatus::Skipped, None);
                    }
                    Err(e) => {
                        let msg = e.to_string();
                        self.emit_progress(&stage.id, op, ProgressStatus::Failed, Some(msg.as_str()));
                        let rollback_errors = if dry { Vec::new() } else { mutations.rollback() };
                        for re in &rollback_errors {
                            log::error!("{re}");
                        }
                        journal.rollback(&applied);
                        return ExecutionResult {
                            success: false,
                            applied,
                            failed: vec![FailedOperation {
                                operation: op.clone(),
                                error: msg,
                            }],
                            rollback_available: !dry,
                            log_path: None,
                            artifacts: journal.artifacts(),
                            rollback_errors,
                            duration_ms: t0.elapsed().as_millis() as u64,
                        };
                    }
                }
            }
            if !dry {
                journal.commit_stage(&stage.id);
            }
        }

        let mut log_path = None;
        if !dry {
            let entries = journal.entries();
            if !entries.is_empty() && journal.log_path().is_none() {
                let path = self.backup_dir.join(format!("{}-{LOG_FILE_SUFFIX}", unix_millis()));
                match journal::write_log(&path, &entries) {
                    Ok(()) => {
                        journal.set_log_path(path.clone());
                        log_path = Some(path);
                    }
                    Err(e) => log::error!("failed to persist setup log: {e}"),
                }
            } else {
                log_path = journal.log_path().map(Path::to_path_buf);
            }
        }

        ExecutionResult {
            success: true,
            applied,
            failed: Vec::new(),
            rollback_available: !dry,
            log_path,
            artifacts: journal.artifacts(),
            rollback_errors: Vec::new(),
            duration_ms: t0.elapsed().as_millis() as u64,
        }
    }

    /// Dry-run path: consult the registry simulator, or validate that file
    /// content is resolvable. Config and script operations have nothing to
    /// pre-validate.
    fn simulate_one(&self, op: &PlannedOperation, ctx: &ExecCtx<'_>) -> Result<()> {
        if let Some(exec) = self.registry.and_then(|r| r.executor(op.operation.kind())) {
            return exec.simulate(op, ctx);
        }
        match &op.operation {
            Operation::File(f) => file::simulate_file(f, &op.metadata, ctx),
            Operation::Config(_) | Operation::Script(_) | Operation::Code(_) => Ok(()),
        }
    }

    fn apply_one(
        &self,
        op: &PlannedOperation,
        ctx: &ExecCtx<'_>,
        journal: &mut dyn Journal,
        mutations: &mut MutationLog,
    ) -> Result<ExecOutcome> {
        journal.before_operation(op)?;
        let outcome = self.dispatch(op, ctx, mutations)?;
        journal.after_operation(op, outcome.backup_path.as_deref())?;
        Ok(outcome)
    }

    fn dispatch(
        &self,
        op: &PlannedOperation,
        ctx: &ExecCtx<'_>,
        mutations: &mut MutationLog,
    ) -> Result<ExecOutcome> {
        if let Some(exec) = self.registry.and_then(|r| r.executor(op.operation.kind())) {
            return exec.execute(op, ctx);
        }
        match &op.operation {
            Operation::File(f) => file::apply_file(f, &op.metadata, ctx, mutations),
            Operation::Config(c) => config::apply_config(c, &op.metadata, ctx, mutations),
            Operation::Script(s) => script::apply_script(s, &op.metadata, ctx, mutations),
            Operation::Code(_) => Err(Error::new(
                ErrorKind::UnsupportedKind,
                format!(
                    "unsupported kind '{}' for operation {}; register an executor to handle it",
                    op.operation.kind(),
                    op.id()
                ),
            )),
        }
    }

    fn emit_progress(
        &self,
        stage_id: &str,
        op: &PlannedOperation,
        status: ProgressStatus,
        error: Option<&str>,
    ) {
        if let Some(cb) = self.progress {
            cb(&ProgressEvent {
                stage_id: stage_id.to_string(),
                operation: op.clone(),
                status,
                error: error.map(str::to_owned),
            });
        }
    }
}
