//! Low-level filesystem helpers: metadata probes, backups, JSON file I/O.

pub mod backup;
pub mod jsonio;
pub mod meta;
