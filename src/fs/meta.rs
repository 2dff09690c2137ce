//! Non-mutating filesystem probes used by analysis and the journal.

use std::path::Path;

use sha2::{Digest, Sha256};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Compute SHA-256 over a byte slice, returning lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compute SHA-256 of a file at `path`, returning lowercase hex.
pub fn sha256_hex_of(path: &Path) -> Option<String> {
    let mut f = std::fs::File::open(path).ok()?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut f, &mut hasher).ok()?;
    Some(hex::encode(hasher.finalize()))
}

/// Observed file metadata for analysis rows and snapshots.
#[derive(Clone, Debug)]
pub struct FileStat {
    pub size: u64,
    /// Permission bits masked to 0o777.
    pub mode: u32,
    /// Modification time as RFC-3339, when the platform reports one.
    pub mtime: Option<String>,
}

/// Stat a regular file. Returns `None` when the path is absent or metadata
/// is unreadable.
pub fn stat_file(path: &Path) -> Option<FileStat> {
    let md = std::fs::metadata(path).ok()?;
    let mode = {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            md.permissions().mode() & 0o777
        }
        #[cfg(not(unix))]
        {
            0
        }
    };
    let mtime = md
        .modified()
        .ok()
        .map(OffsetDateTime::from)
        .and_then(|t| t.format(&Rfc3339).ok());
    Some(FileStat {
        size: md.len(),
        mode,
        mtime,
    })
}
