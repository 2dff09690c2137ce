//! Shared crate-wide constants for Groundwork.
//!
//! Centralizes magic values and default labels used across modules.
//! Adjusting these here will propagate through the crate.

/// Default backup directory, relative to the workspace root.
/// Backups and the persisted setup log live here unless overridden.
pub const DEFAULT_BACKUP_SUBDIR: &str = ".kb/logs/setup";

/// File name suffix for persisted journal logs: `<unix-ms>-setup-log.json`.
pub const LOG_FILE_SUFFIX: &str = "setup-log.json";

/// Extension for per-operation backup payloads:
/// `<unix-ms>-<op-id>-<rel-path>.bak`.
pub const BACKUP_EXT: &str = "bak";

/// Snapshot content above this many bytes is replaced with a
/// `<truncated N bytes>` placeholder; the checksum still covers the full bytes.
pub const DEFAULT_SNAPSHOT_CONTENT_CAP: usize = 256 * 1024;

/// UUIDv5 namespace tag for deterministic plan/operation IDs.
pub const NS_TAG: &str = "https://kb-labs/groundwork";

/// Stage identifiers are `stage-1`, `stage-2`, ... in production order.
pub const STAGE_ID_PREFIX: &str = "stage-";
