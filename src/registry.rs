//! Per-run handler registry: open polymorphism over a capability set
//! `{analyze, build_diff, simulate, execute}` keyed by operation kind.
//!
//! Custom handlers always take precedence over built-ins, so a caller can
//! claim an unknown kind (e.g. `code`) or reshape how a built-in kind is
//! analyzed, previewed, or applied.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::analysis::AnalysisResult;
use crate::types::errors::Result;
use crate::types::op::PlannedOperation;
use crate::types::plan::DiffEntry;

/// Read-only context handed to analyzers and diff builders.
#[derive(Clone, Copy, Debug)]
pub struct HandlerCtx<'a> {
    pub workspace_root: &'a Path,
}

/// Context handed to executors.
#[derive(Clone, Copy, Debug)]
pub struct ExecCtx<'a> {
    pub workspace_root: &'a Path,
    pub backup_dir: &'a Path,
    /// Resolves `prompt`-style conflicts without interaction when true.
    pub auto_confirm: bool,
}

/// Result of executing one operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecOutcome {
    /// False when the workspace already matched the declared target.
    pub changed: bool,
    /// Set iff a backup of the pre-mutation target was written.
    pub backup_path: Option<PathBuf>,
}

impl ExecOutcome {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed(backup_path: Option<PathBuf>) -> Self {
        Self {
            changed: true,
            backup_path,
        }
    }
}

pub trait OpAnalyzer {
    fn analyze(&self, op: &PlannedOperation, ctx: &HandlerCtx<'_>) -> AnalysisResult;
}

pub trait DiffBuilder {
    fn build_diff(
        &self,
        op: &PlannedOperation,
        analysis: Option<&AnalysisResult>,
        ctx: &HandlerCtx<'_>,
    ) -> Option<DiffEntry>;
}

pub trait OpExecutor {
    /// Dry-run hook; the default validates nothing.
    fn simulate(&self, _op: &PlannedOperation, _ctx: &ExecCtx<'_>) -> Result<()> {
        Ok(())
    }

    fn execute(&self, op: &PlannedOperation, ctx: &ExecCtx<'_>) -> Result<ExecOutcome>;
}

// Plain closures register directly as handlers; an executor closure gets the
// default no-op simulate.
impl<F> OpAnalyzer for F
where
    F: Fn(&PlannedOperation, &HandlerCtx<'_>) -> AnalysisResult,
{
    fn analyze(&self, op: &PlannedOperation, ctx: &HandlerCtx<'_>) -> AnalysisResult {
        self(op, ctx)
    }
}

impl<F> DiffBuilder for F
where
    F: Fn(&PlannedOperation, Option<&AnalysisResult>, &HandlerCtx<'_>) -> Option<DiffEntry>,
{
    fn build_diff(
        &self,
        op: &PlannedOperation,
        analysis: Option<&AnalysisResult>,
        ctx: &HandlerCtx<'_>,
    ) -> Option<DiffEntry> {
        self(op, analysis, ctx)
    }
}

impl<F> OpExecutor for F
where
    F: Fn(&PlannedOperation, &ExecCtx<'_>) -> Result<ExecOutcome>,
{
    fn execute(&self, op: &PlannedOperation, ctx: &ExecCtx<'_>) -> Result<ExecOutcome> {
        self(op, ctx)
    }
}

/// Lookup table of per-kind overrides consulted before the built-ins.
#[derive(Default)]
pub struct OperationRegistry {
    analyzers: HashMap<String, Box<dyn OpAnalyzer>>,
    diff_builders: HashMap<String, Box<dyn DiffBuilder>>,
    executors: HashMap<String, Box<dyn OpExecutor>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_analyzer(&mut self, kind: impl Into<String>, handler: Box<dyn OpAnalyzer>) {
        self.analyzers.insert(kind.into(), handler);
    }

    pub fn register_diff_builder(&mut self, kind: impl Into<String>, handler: Box<dyn DiffBuilder>) {
        self.diff_builders.insert(kind.into(), handler);
    }

    pub fn register_executor(&mut self, kind: impl Into<String>, handler: Box<dyn OpExecutor>) {
        self.executors.insert(kind.into(), handler);
    }

    pub fn analyzer(&self, kind: &str) -> Option<&dyn OpAnalyzer> {
        self.analyzers.get(kind).map(|b| b.as_ref())
    }

    pub fn diff_builder(&self, kind: &str) -> Option<&dyn DiffBuilder> {
        self.diff_builders.get(kind).map(|b| b.as_ref())
    }

    pub fn executor(&self, kind: &str) -> Option<&dyn OpExecutor> {
        self.executors.get(kind).map(|b| b.as_ref())
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("analyzers", &self.analyzers.keys().collect::<Vec<_>>())
            .field("diff_builders", &self.diff_builders.keys().collect::<Vec<_>>())
            .field("executors", &self.executors.keys().collect::<Vec<_>>())
            .finish()
    }
}
