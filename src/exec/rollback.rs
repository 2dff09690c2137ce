//! In-memory mutation log and reverse-order rollback.

use std::path::PathBuf;

/// One recorded mutation of the workspace.
#[derive(Clone, Debug)]
pub(crate) struct Mutation {
    pub target: PathBuf,
    /// Present iff the target existed before and was backed up.
    pub backup: Option<PathBuf>,
    pub existed_before: bool,
}

/// Append-only list of mutations performed by one run, in apply order.
#[derive(Debug, Default)]
pub(crate) struct MutationLog {
    records: Vec<Mutation>,
}

impl MutationLog {
    pub fn record(&mut self, target: PathBuf, backup: Option<PathBuf>, existed_before: bool) {
        self.records.push(Mutation {
            target,
            backup,
            existed_before,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Undo every mutation in reverse order: restore from backup when one
    /// exists, otherwise remove the file this run created. Pre-existing files
    /// without a backup are never deleted. Best effort; failures are
    /// collected, not raised.
    pub fn rollback(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for m in self.records.iter().rev() {
            match &m.backup {
                Some(backup) => {
                    if let Err(e) = crate::fs::backup::restore_backup(backup, &m.target) {
                        errors.push(format!(
                            "rollback restore {} failed: {e}",
                            m.target.display()
                        ));
                    }
                }
                None if !m.existed_before => {
                    if let Err(e) = std::fs::remove_file(&m.target) {
                        if e.kind() != std::io::ErrorKind::NotFound {
                            errors.push(format!(
                                "rollback remove {} failed: {e}",
                                m.target.display()
                            ));
                        }
                    }
                }
                None => {}
            }
        }
        errors
    }
}
