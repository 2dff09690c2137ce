//! Change journal: append-only per-run record of before/after snapshots and
//! backup artifacts, persisted as a pretty-JSON log a rollback tool can
//! replay.
//!
//! Side-effects:
//! - `FsJournal` reads the targeted files to capture snapshots; it never
//!   writes to the workspace itself.
//! - Entries handed out via `entries()` are deep clones; callers cannot
//!   mutate history.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::DEFAULT_SNAPSHOT_CONTENT_CAP;
use crate::fs::meta::{sha256_hex, stat_file};
use crate::logging::now_iso;
use crate::types::errors::{Error, ErrorKind, Result};
use crate::types::op::PlannedOperation;
use crate::types::report::Artifacts;

/// Point-in-time view of one target path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// SHA-256 over the full bytes, even when `content` is truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Snapshot {
    pub fn absent() -> Self {
        Self::default()
    }
}

/// One journaled mutation: the operation, its before/after snapshots, and the
/// backup payload path when one was written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// ISO-8601 capture time of the `before` snapshot.
    pub timestamp: String,
    pub operation: PlannedOperation,
    pub before: Snapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Snapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

/// Per-run mutation record consumed by the executor.
pub trait Journal {
    fn start_stage(&mut self, stage_id: &str);
    fn before_operation(&mut self, op: &PlannedOperation) -> Result<()>;
    fn after_operation(&mut self, op: &PlannedOperation, backup_path: Option<&Path>) -> Result<()>;
    fn commit_stage(&mut self, stage_id: &str);
    /// Record that the listed applied operations were rolled back. Entries
    /// are retained; the journal stays append-only.
    fn rollback(&mut self, applied: &[PlannedOperation]);
    /// Deep-cloned entries in append order.
    fn entries(&self) -> Vec<JournalEntry>;
    fn artifacts(&self) -> Artifacts;
    fn log_path(&self) -> Option<&Path>;
    fn set_log_path(&mut self, path: PathBuf);
}

/// Snapshot-capturing journal bound to a workspace root.
#[derive(Debug)]
pub struct FsJournal {
    workspace_root: PathBuf,
    content_cap: usize,
    entries: Vec<JournalEntry>,
    rolled_back: Vec<String>,
    log_path: Option<PathBuf>,
    current_stage: Option<String>,
}

impl FsJournal {
    pub fn new(workspace_root: &Path) -> Self {
        Self {
            workspace_root: workspace_root.to_path_buf(),
            content_cap: DEFAULT_SNAPSHOT_CONTENT_CAP,
            entries: Vec::new(),
            rolled_back: Vec::new(),
            log_path: None,
            current_stage: None,
        }
    }

    /// Cap snapshot content at `bytes`; larger payloads are replaced with a
    /// `<truncated N bytes>` placeholder.
    pub fn with_content_cap(mut self, bytes: usize) -> Self {
        self.content_cap = bytes;
        self
    }

    /// Operation ids whose applied mutations were rolled back this run.
    pub fn rolled_back_ids(&self) -> &[String] {
        &self.rolled_back
    }

    fn snapshot(&self, op: &PlannedOperation) -> Snapshot {
        snapshot_path(
            &self.workspace_root.join(op.operation.target_path()),
            self.content_cap,
        )
    }
}

impl Journal for FsJournal {
    fn start_stage(&mut self, stage_id: &str) {
        self.current_stage = Some(stage_id.to_string());
        log::debug!("journal: stage {stage_id} started");
    }

    fn before_operation(&mut self, op: &PlannedOperation) -> Result<()> {
        let before = self.snapshot(op);
        self.entries.push(JournalEntry {
            timestamp: now_iso(),
            operation: op.clone(),
            before,
            after: None,
            backup_path: None,
        });
        Ok(())
    }

    fn after_operation(&mut self, op: &PlannedOperation, backup_path: Option<&Path>) -> Result<()> {
        let after = self.snapshot(op);
        let entry = self
            .entries
            .iter_mut()
            .rev()
            .find(|e| e.operation.id() == op.id())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Io,
                    format!("no journal entry opened for operation {}", op.id()),
                )
            })?;
        entry.after = Some(after);
        entry.backup_path = backup_path.map(Path::to_path_buf);
        Ok(())
    }

    fn commit_stage(&mut self, stage_id: &str) {
        self.current_stage = None;
        log::debug!("journal: stage {stage_id} committed");
    }

    fn rollback(&mut self, applied: &[PlannedOperation]) {
        self.rolled_back
            .extend(applied.iter().map(|op| op.id().to_string()));
        log::warn!("journal: rolled back {} operation(s)", applied.len());
    }

    fn entries(&self) -> Vec<JournalEntry> {
        self.entries.clone()
    }

    fn artifacts(&self) -> Artifacts {
        Artifacts {
            backups: self
                .entries
                .iter()
                .filter_map(|e| e.backup_path.clone())
                .collect(),
            logs: self.log_path.iter().cloned().collect(),
        }
    }

    fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    fn set_log_path(&mut self, path: PathBuf) {
        self.log_path = Some(path);
    }
}

/// Snapshot-free journal for tests: records operations and backup paths but
/// never reads the workspace.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    entries: Vec<JournalEntry>,
    rolled_back: Vec<String>,
    log_path: Option<PathBuf>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rolled_back_ids(&self) -> &[String] {
        &self.rolled_back
    }
}

impl Journal for MemoryJournal {
    fn start_stage(&mut self, _stage_id: &str) {}

    fn before_operation(&mut self, op: &PlannedOperation) -> Result<()> {
        self.entries.push(JournalEntry {
            timestamp: now_iso(),
            operation: op.clone(),
            before: Snapshot::absent(),
            after: None,
            backup_path: None,
        });
        Ok(())
    }

    fn after_operation(&mut self, op: &PlannedOperation, backup_path: Option<&Path>) -> Result<()> {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .rev()
            .find(|e| e.operation.id() == op.id())
        {
            entry.backup_path = backup_path.map(Path::to_path_buf);
        }
        Ok(())
    }

    fn commit_stage(&mut self, _stage_id: &str) {}

    fn rollback(&mut self, applied: &[PlannedOperation]) {
        self.rolled_back
            .extend(applied.iter().map(|op| op.id().to_string()));
    }

    fn entries(&self) -> Vec<JournalEntry> {
        self.entries.clone()
    }

    fn artifacts(&self) -> Artifacts {
        Artifacts {
            backups: self
                .entries
                .iter()
                .filter_map(|e| e.backup_path.clone())
                .collect(),
            logs: self.log_path.iter().cloned().collect(),
        }
    }

    fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    fn set_log_path(&mut self, path: PathBuf) {
        self.log_path = Some(path);
    }
}

/// Capture a snapshot of `path`, truncating content beyond `cap` bytes while
/// keeping the checksum over the full payload.
pub fn snapshot_path(path: &Path, cap: usize) -> Snapshot {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(_) => return Snapshot::absent(),
    };
    let checksum = sha256_hex(&bytes);
    let content = if bytes.len() > cap {
        format!("<truncated {} bytes>", bytes.len())
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };
    let metadata = stat_file(path).map(|st| {
        json!({
            "size": st.size,
            "mode": st.mode,
            "mtime": st.mtime,
        })
    });
    Snapshot {
        exists: true,
        content: Some(content),
        checksum: Some(checksum),
        metadata,
    }
}

/// Persist journal entries as a pretty-JSON array (the on-disk log format).
pub fn write_log(path: &Path, entries: &[JournalEntry]) -> Result<()> {
    let doc = serde_json::to_value(entries)
        .map_err(|e| Error::new(ErrorKind::InvalidJson, e.to_string()))?;
    crate::fs::jsonio::write_json_pretty(path, &doc)
}

/// Load a persisted log. Inverse of [`write_log`].
pub fn read_log(path: &Path) -> Result<Vec<JournalEntry>> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::new(ErrorKind::InvalidJson, format!("{}: {e}", path.display())))
}
