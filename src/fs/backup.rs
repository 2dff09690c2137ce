//! Per-operation backups: verbatim byte-for-byte copies of the pre-mutation
//! target, created only when the target existed.
//!
//! Filenames follow `<unix-ms>-<op-id>-<rel-path>.bak` with every character
//! outside `[A-Za-z0-9._-]` replaced by `_`, so one backup directory can hold
//! artifacts from many operations without nesting.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::BACKUP_EXT;

/// Milliseconds since the Unix epoch, used in backup and log file names.
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Replace anything outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Compute a backup path for `op_id` / `rel_path` under `backup_dir` at the
/// current instant.
pub fn backup_path_for(backup_dir: &Path, op_id: &str, rel_path: &Path) -> PathBuf {
    let rel = sanitize_component(&rel_path.to_string_lossy());
    let op = sanitize_component(op_id);
    backup_dir.join(format!("{}-{op}-{rel}.{BACKUP_EXT}", unix_millis()))
}

/// Copy the pre-mutation `target` to a fresh backup file under `backup_dir`.
///
/// The caller is responsible for only invoking this when the target exists.
/// On a same-millisecond name collision the timestamp is bumped until unique.
pub fn create_backup(
    target: &Path,
    backup_dir: &Path,
    op_id: &str,
    rel_path: &Path,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(backup_dir)?;
    let mut backup = backup_path_for(backup_dir, op_id, rel_path);
    while backup.exists() {
        if let Some(bumped) = bump_timestamp(&backup) {
            backup = bumped;
        } else {
            break;
        }
    }
    std::fs::copy(target, &backup)?;
    Ok(backup)
}

/// Restore `target` from its backup by copying the backup bytes back over it.
pub fn restore_backup(backup: &Path, target: &Path) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(backup, target).map(|_| ())
}

fn bump_timestamp(backup: &Path) -> Option<PathBuf> {
    let stem = backup.file_name()?.to_str()?;
    let (ts_s, rest) = stem.split_once('-')?;
    let ts: u128 = ts_s.parse().ok()?;
    let parent = backup.parent().unwrap_or_else(|| Path::new("."));
    Some(parent.join(format!("{}-{rest}", ts.saturating_add(1))))
}
