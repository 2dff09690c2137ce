//! File applier: ensure/update writes with backup-before-overwrite, deletes
//! with backup, byte-equality short-circuit.

use std::path::Path;

use crate::fs::backup::create_backup;
use crate::registry::{ExecCtx, ExecOutcome};
use crate::types::errors::{Error, Result};
use crate::types::op::{FileAction, FileOp, OperationMetadata};
use crate::types::safepath::SafePath;

use super::content::resolve_file_bytes;
use super::rollback::MutationLog;

pub(crate) fn apply_file(
    op: &FileOp,
    metadata: &OperationMetadata,
    ctx: &ExecCtx<'_>,
    mutations: &mut MutationLog,
) -> Result<ExecOutcome> {
    let safe = SafePath::from_rooted(ctx.workspace_root, Path::new(&op.path))?;
    let target = safe.as_path();

    if op.action == FileAction::Delete {
        if !target.exists() {
            return Ok(ExecOutcome::unchanged());
        }
        let backup = create_backup(&target, ctx.backup_dir, &metadata.id, safe.rel())
            .map_err(|e| Error::io(&target, &e))?;
        std::fs::remove_file(&target).map_err(|e| Error::io(&target, &e))?;
        mutations.record(target, Some(backup.clone()), true);
        return Ok(ExecOutcome::changed(Some(backup)));
    }

    let next = resolve_file_bytes(op, metadata, ctx.workspace_root)?;
    let existed = target.exists();
    if existed {
        let current = std::fs::read(&target).map_err(|e| Error::io(&target, &e))?;
        if current == next {
            return Ok(ExecOutcome::unchanged());
        }
    }

    let backup = if existed {
        Some(
            create_backup(&target, ctx.backup_dir, &metadata.id, safe.rel())
                .map_err(|e| Error::io(&target, &e))?,
        )
    } else {
        None
    };

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, &e))?;
    }
    std::fs::write(&target, &next).map_err(|e| Error::io(&target, &e))?;
    if let Some(mode) = op.mode {
        set_mode(&target, mode)?;
    }

    mutations.record(target, backup.clone(), existed);
    Ok(ExecOutcome::changed(backup))
}

/// Validate that content is resolvable without touching the target; the
/// dry-run path for file operations.
pub(crate) fn simulate_file(
    op: &FileOp,
    metadata: &OperationMetadata,
    ctx: &ExecCtx<'_>,
) -> Result<()> {
    SafePath::from_rooted(ctx.workspace_root, Path::new(&op.path))?;
    if op.action != FileAction::Delete {
        resolve_file_bytes(op, metadata, ctx.workspace_root)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_mode(target: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    std::fs::set_permissions(target, std::fs::Permissions::from_mode(mode & 0o777))
        .map_err(|e| Error::io(target, &e))
}

#[cfg(not(unix))]
fn set_mode(_target: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
